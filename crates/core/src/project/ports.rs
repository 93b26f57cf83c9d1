//! Port interfaces for project persistence

use async_trait::async_trait;
use sunquote_domain::types::Project;
use sunquote_domain::Result;
use uuid::Uuid;

/// Trait for persisting projects
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Get a project by id
    async fn get_project(&self, id: Uuid) -> Result<Option<Project>>;

    /// List all projects, most recently updated first
    async fn list_projects(&self) -> Result<Vec<Project>>;

    /// Insert or fully update a project
    async fn upsert_project(&self, project: &Project) -> Result<()>;

    /// Push a freshly computed BOM subtotal onto the project record.
    ///
    /// Kept separate from `upsert_project` because BOM saves write the
    /// subtotal without touching intake fields.
    async fn set_bom_subtotal(&self, project_id: Uuid, subtotal: f64) -> Result<()>;
}
