//! Port interface for uploaded consumption data

use async_trait::async_trait;
use sunquote_domain::types::ConsumptionSeries;
use sunquote_domain::Result;
use uuid::Uuid;

/// Trait for storing a project's uploaded consumption series.
///
/// Each project holds at most one series; a new upload replaces the old.
#[async_trait]
pub trait ConsumptionRepository: Send + Sync {
    /// Replace the project's stored series
    async fn replace_series(&self, series: &ConsumptionSeries) -> Result<()>;

    /// Get the project's stored series, if one was uploaded
    async fn get_series(&self, project_id: Uuid) -> Result<Option<ConsumptionSeries>>;

    /// Delete the project's stored series
    async fn delete_series(&self, project_id: Uuid) -> Result<()>;
}
