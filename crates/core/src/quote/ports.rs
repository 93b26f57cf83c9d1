//! Port interfaces for quote persistence

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sunquote_domain::types::{QuoteStatus, QuoteVersion};
use sunquote_domain::Result;
use uuid::Uuid;

/// Trait for persisting quote versions
///
/// Versions are immutable snapshots: implementations must never rewrite a
/// stored version's lines or totals. Only status, lifecycle timestamps,
/// and draft metadata (title/notes) may change after insert.
#[async_trait]
pub trait QuoteRepository: Send + Sync {
    /// Insert a new quote version with its snapshot lines
    async fn insert_version(&self, quote: &QuoteVersion) -> Result<()>;

    /// Get a quote version by id
    async fn get_quote(&self, id: Uuid) -> Result<Option<QuoteVersion>>;

    /// List a project's versions, newest first
    async fn list_for_project(&self, project_id: Uuid) -> Result<Vec<QuoteVersion>>;

    /// Highest version number stored for a project (0 when none)
    async fn latest_version_number(&self, project_id: Uuid) -> Result<u32>;

    /// Update status and lifecycle timestamps
    async fn update_status(
        &self,
        id: Uuid,
        status: QuoteStatus,
        sent_at: Option<DateTime<Utc>>,
        decided_at: Option<DateTime<Utc>>,
    ) -> Result<()>;

    /// Update draft metadata (title/notes)
    async fn update_draft_details(
        &self,
        id: Uuid,
        title: Option<String>,
        notes: Option<String>,
    ) -> Result<()>;

    /// Delete a quote version and its lines
    async fn delete_quote(&self, id: Uuid) -> Result<()>;

    /// Whether any of the project's versions has left Draft
    async fn has_sent_version(&self, project_id: Uuid) -> Result<bool>;
}
