//! Port interfaces for stock load profiles

use async_trait::async_trait;
use sunquote_domain::types::LoadProfile;
use sunquote_domain::Result;
use uuid::Uuid;

/// Trait for reading stock load profiles
#[async_trait]
pub trait LoadProfileRepository: Send + Sync {
    /// List all stock profiles (values included)
    async fn list_profiles(&self) -> Result<Vec<LoadProfile>>;

    /// Get a profile by id
    async fn get_profile(&self, id: Uuid) -> Result<Option<LoadProfile>>;

    /// Insert or update a stock profile
    async fn upsert_profile(&self, profile: &LoadProfile) -> Result<()>;
}
