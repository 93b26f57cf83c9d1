//! Quote service - versioning and lifecycle transitions

use std::sync::Arc;

use chrono::Utc;
use sunquote_domain::types::{QuoteLine, QuoteStatus, QuoteVersion};
use sunquote_domain::{Result, SunquoteError};
use tracing::info;
use uuid::Uuid;

use super::ports::QuoteRepository;
use crate::bom::ports::BomRepository;
use crate::catalog::ports::ProductRepository;
use crate::pricing;
use crate::project::ports::ProjectRepository;

/// Quote versioning and lifecycle service
pub struct QuoteService {
    quotes: Arc<dyn QuoteRepository>,
    boms: Arc<dyn BomRepository>,
    products: Arc<dyn ProductRepository>,
    projects: Arc<dyn ProjectRepository>,
}

impl QuoteService {
    pub fn new(
        quotes: Arc<dyn QuoteRepository>,
        boms: Arc<dyn BomRepository>,
        products: Arc<dyn ProductRepository>,
        projects: Arc<dyn ProjectRepository>,
    ) -> Self {
        Self { quotes, boms, products, projects }
    }

    /// Snapshot the project's current BOM into a new quote version.
    ///
    /// The snapshot pins unit cost and margin per line, so later catalog
    /// price changes never alter the stored version. This is a snapshot
    /// operation, not a sync.
    pub async fn create_version(
        &self,
        project_id: Uuid,
        title: Option<String>,
        notes: Option<String>,
    ) -> Result<QuoteVersion> {
        let project = self
            .projects
            .get_project(project_id)
            .await?
            .ok_or_else(|| SunquoteError::NotFound(format!("project {project_id}")))?;

        let lines = self.boms.get_lines(project_id).await?;
        if lines.is_empty() {
            return Err(SunquoteError::InvalidInput(
                "cannot create a quote from an empty bill of materials".into(),
            ));
        }

        let ids: Vec<Uuid> = lines.iter().map(|line| line.product_id).collect();
        let catalog = self.products.get_products(&ids).await?;

        let mut snapshot: Vec<QuoteLine> = Vec::with_capacity(lines.len());
        for line in &lines {
            let product = catalog.get(&line.product_id).ok_or_else(|| {
                SunquoteError::InvalidInput(format!("unknown product {}", line.product_id))
            })?;
            snapshot.push(pricing::price_line(line, product).into());
        }
        let subtotal: f64 = snapshot.iter().map(|line| line.line_total).sum();

        let version = self.quotes.latest_version_number(project_id).await? + 1;
        let quote = QuoteVersion {
            id: Uuid::new_v4(),
            project_id: project.id,
            version,
            status: QuoteStatus::Draft,
            title,
            notes,
            lines: snapshot,
            subtotal,
            created_at: Utc::now(),
            sent_at: None,
            decided_at: None,
        };

        self.quotes.insert_version(&quote).await?;
        info!(%project_id, version, subtotal, "quote version created");
        Ok(quote)
    }

    /// Get a quote version.
    pub async fn get(&self, id: Uuid) -> Result<QuoteVersion> {
        self.quotes
            .get_quote(id)
            .await?
            .ok_or_else(|| SunquoteError::NotFound(format!("quote {id}")))
    }

    /// List a project's versions, newest first.
    pub async fn list_for_project(&self, project_id: Uuid) -> Result<Vec<QuoteVersion>> {
        self.quotes.list_for_project(project_id).await
    }

    /// Mark a draft quote as sent.
    pub async fn send(&self, id: Uuid) -> Result<QuoteVersion> {
        self.transition(id, QuoteStatus::Sent).await
    }

    /// Mark a sent quote as accepted.
    pub async fn accept(&self, id: Uuid) -> Result<QuoteVersion> {
        self.transition(id, QuoteStatus::Accepted).await
    }

    /// Mark a sent quote as declined.
    pub async fn decline(&self, id: Uuid) -> Result<QuoteVersion> {
        self.transition(id, QuoteStatus::Declined).await
    }

    /// Update a draft's title/notes. Conflict once the quote has left
    /// Draft: sent documents are frozen.
    pub async fn update_draft(
        &self,
        id: Uuid,
        title: Option<String>,
        notes: Option<String>,
    ) -> Result<QuoteVersion> {
        let quote = self.get(id).await?;
        if quote.status != QuoteStatus::Draft {
            return Err(SunquoteError::Conflict(format!(
                "quote {id} is {} and can no longer be edited",
                quote.status.as_str()
            )));
        }
        self.quotes.update_draft_details(id, title, notes).await?;
        self.get(id).await
    }

    /// Delete a draft. Conflict once the quote has left Draft.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let quote = self.get(id).await?;
        if quote.status != QuoteStatus::Draft {
            return Err(SunquoteError::Conflict(format!(
                "quote {id} is {} and cannot be deleted",
                quote.status.as_str()
            )));
        }
        self.quotes.delete_quote(id).await
    }

    async fn transition(&self, id: Uuid, next: QuoteStatus) -> Result<QuoteVersion> {
        let quote = self.get(id).await?;
        if !quote.status.can_transition_to(next) {
            return Err(SunquoteError::Conflict(format!(
                "quote {id} cannot move from {} to {}",
                quote.status.as_str(),
                next.as_str()
            )));
        }

        let now = Utc::now();
        let (sent_at, decided_at) = match next {
            QuoteStatus::Sent => (Some(now), None),
            QuoteStatus::Accepted | QuoteStatus::Declined => (quote.sent_at, Some(now)),
            QuoteStatus::Draft => (None, None),
        };
        self.quotes.update_status(id, next, sent_at, decided_at).await?;
        info!(quote_id = %id, from = quote.status.as_str(), to = next.as_str(), "quote transitioned");
        self.get(id).await
    }
}
