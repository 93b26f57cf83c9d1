//! Port interfaces for BOM persistence

use async_trait::async_trait;
use sunquote_domain::types::{BomLine, BomTemplate};
use sunquote_domain::Result;
use uuid::Uuid;

/// Trait for persisting a project's BOM lines
#[async_trait]
pub trait BomRepository: Send + Sync {
    /// Get the saved lines for a project, in saved order
    async fn get_lines(&self, project_id: Uuid) -> Result<Vec<BomLine>>;

    /// Replace the project's lines wholesale (single transaction)
    async fn replace_lines(&self, project_id: Uuid, lines: &[BomLine]) -> Result<()>;
}

/// Trait for persisting reusable BOM templates
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Save a template
    async fn save_template(&self, template: &BomTemplate) -> Result<()>;

    /// Get a template by id
    async fn get_template(&self, id: Uuid) -> Result<Option<BomTemplate>>;

    /// List all templates, newest first
    async fn list_templates(&self) -> Result<Vec<BomTemplate>>;
}
