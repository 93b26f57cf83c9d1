//! BOM service - core business logic

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use sunquote_domain::constants::MIN_LINE_QUANTITY;
use sunquote_domain::types::{BomLine, BomMode, BomTemplate, Product, Project, TemplateLine};
use sunquote_domain::{Result, SunquoteError};
use tracing::info;
use uuid::Uuid;

use super::ports::{BomRepository, TemplateRepository};
use super::{line_permissions, regenerate_core_lines};
use crate::catalog::ports::ProductRepository;
use crate::pricing::{self, PricedLine};
use crate::project::ports::ProjectRepository;
use crate::quote::ports::QuoteRepository;

/// Result of a BOM save or reprice: the persisted lines, their pricing,
/// and the subtotal that was pushed onto the project.
#[derive(Debug, Clone)]
pub struct SavedBom {
    pub lines: Vec<BomLine>,
    pub priced: Vec<PricedLine>,
    pub subtotal: f64,
}

/// BOM management service
pub struct BomService {
    boms: Arc<dyn BomRepository>,
    products: Arc<dyn ProductRepository>,
    projects: Arc<dyn ProjectRepository>,
    templates: Arc<dyn TemplateRepository>,
    quotes: Arc<dyn QuoteRepository>,
}

impl BomService {
    pub fn new(
        boms: Arc<dyn BomRepository>,
        products: Arc<dyn ProductRepository>,
        projects: Arc<dyn ProjectRepository>,
        templates: Arc<dyn TemplateRepository>,
        quotes: Arc<dyn QuoteRepository>,
    ) -> Self {
        Self { boms, products, projects, templates, quotes }
    }

    /// Load and price a project's current BOM without modifying it.
    pub async fn priced_bom(&self, project_id: Uuid) -> Result<SavedBom> {
        self.require_project(project_id).await?;
        let lines = self.boms.get_lines(project_id).await?;
        let (priced, subtotal) = self.price_lines(&lines).await?;
        Ok(SavedBom { lines, priced, subtotal })
    }

    /// Save a project's BOM.
    ///
    /// Validates quantities, normalizes margin overrides, enforces edit
    /// gating (core lines are re-derived from the design whenever they are
    /// locked, so client-sent core edits cannot stick), persists the lines,
    /// and then pushes the computed subtotal back onto the project record
    /// as a second persistence step.
    pub async fn save_bom(
        &self,
        project_id: Uuid,
        mode: BomMode,
        mut incoming: Vec<BomLine>,
    ) -> Result<SavedBom> {
        let project = self.require_project(project_id).await?;

        for line in &incoming {
            if line.quantity < MIN_LINE_QUANTITY {
                return Err(SunquoteError::InvalidInput(format!(
                    "quantity for product {} must be at least {MIN_LINE_QUANTITY}",
                    line.product_id
                )));
            }
        }
        for line in &mut incoming {
            line.override_margin = line.override_margin.map(pricing::normalize_margin);
        }

        let has_sent_quote = self.quotes.has_sent_version(project_id).await?;
        let existing = self.boms.get_lines(project_id).await?;
        let catalog = self.resolve_catalog(&project, &incoming, &existing).await?;

        for line in &incoming {
            if !catalog.contains_key(&line.product_id) {
                return Err(SunquoteError::InvalidInput(format!(
                    "unknown product {}",
                    line.product_id
                )));
            }
        }

        let core_locked = has_sent_quote || mode == BomMode::FullSystem;
        let mut lines = if core_locked {
            // Locked core lines are authoritative from the design; the
            // payload's core lines are ignored, previously saved overrides
            // survive.
            let non_core: Vec<BomLine> = incoming
                .iter()
                .filter(|line| !is_core(&catalog, line.product_id))
                .cloned()
                .collect();
            let mut regenerated = regenerate_core_lines(&project.system, &existing, &catalog);
            regenerated.retain(|line| is_core(&catalog, line.product_id));
            regenerated.extend(non_core);
            regenerated
        } else {
            incoming
        };

        // Pinned-cost edits only stick where gating allows them.
        for line in &mut lines {
            let category = match catalog.get(&line.product_id) {
                Some(product) => product.category,
                None => continue,
            };
            let perms = line_permissions(mode, has_sent_quote, category);
            if !perms.can_edit_cost {
                line.unit_cost_at_time = existing
                    .iter()
                    .find(|prev| prev.product_id == line.product_id)
                    .and_then(|prev| prev.unit_cost_at_time);
            }
        }

        self.boms.replace_lines(project_id, &lines).await?;
        let (priced, subtotal) = self.price_lines(&lines).await?;
        self.projects.set_bom_subtotal(project_id, subtotal).await?;

        info!(%project_id, line_count = lines.len(), subtotal, "bom saved");
        Ok(SavedBom { lines, priced, subtotal })
    }

    /// Re-derive core lines after a project's system design changed.
    ///
    /// Replaces only core-category lines, preserving overrides for
    /// surviving product ids, then reprices and updates the subtotal.
    pub async fn apply_design_change(&self, project: &Project) -> Result<SavedBom> {
        let existing = self.boms.get_lines(project.id).await?;
        let catalog = self.resolve_catalog(project, &existing, &[]).await?;

        let lines = regenerate_core_lines(&project.system, &existing, &catalog);
        self.boms.replace_lines(project.id, &lines).await?;
        let (priced, subtotal) = self.price_lines(&lines).await?;
        self.projects.set_bom_subtotal(project.id, subtotal).await?;

        info!(project_id = %project.id, line_count = lines.len(), "core lines regenerated");
        Ok(SavedBom { lines, priced, subtotal })
    }

    /// Save the project's current non-core lines as a reusable template.
    pub async fn save_template(&self, project_id: Uuid, name: &str) -> Result<BomTemplate> {
        if name.trim().is_empty() {
            return Err(SunquoteError::InvalidInput("template name is required".into()));
        }
        self.require_project(project_id).await?;

        let lines = self.boms.get_lines(project_id).await?;
        let ids: Vec<Uuid> = lines.iter().map(|line| line.product_id).collect();
        let catalog = self.products.get_products(&ids).await?;

        let template_lines: Vec<TemplateLine> = lines
            .iter()
            .filter(|line| !is_core(&catalog, line.product_id))
            .map(|line| TemplateLine { product_id: line.product_id, quantity: line.quantity })
            .collect();
        if template_lines.is_empty() {
            return Err(SunquoteError::InvalidInput(
                "project has no non-core lines to save as a template".into(),
            ));
        }

        let template = BomTemplate {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            lines: template_lines,
            created_at: Utc::now(),
        };
        self.templates.save_template(&template).await?;
        Ok(template)
    }

    /// Append a template's lines to a project BOM, skipping products the
    /// BOM already carries, then reprice.
    pub async fn apply_template(&self, project_id: Uuid, template_id: Uuid) -> Result<SavedBom> {
        self.require_project(project_id).await?;
        let template = self
            .templates
            .get_template(template_id)
            .await?
            .ok_or_else(|| SunquoteError::NotFound(format!("template {template_id}")))?;

        let mut lines = self.boms.get_lines(project_id).await?;
        for template_line in &template.lines {
            if lines.iter().any(|line| line.product_id == template_line.product_id) {
                continue;
            }
            lines.push(BomLine::new(template_line.product_id, template_line.quantity.max(1)));
        }

        self.boms.replace_lines(project_id, &lines).await?;
        let (priced, subtotal) = self.price_lines(&lines).await?;
        self.projects.set_bom_subtotal(project_id, subtotal).await?;
        Ok(SavedBom { lines, priced, subtotal })
    }

    async fn require_project(&self, project_id: Uuid) -> Result<Project> {
        self.projects
            .get_project(project_id)
            .await?
            .ok_or_else(|| SunquoteError::NotFound(format!("project {project_id}")))
    }

    /// Resolve every product id referenced by the design and both line
    /// sets into one catalog map.
    async fn resolve_catalog(
        &self,
        project: &Project,
        a: &[BomLine],
        b: &[BomLine],
    ) -> Result<HashMap<Uuid, Product>> {
        let mut ids: Vec<Uuid> =
            project.system.selections().iter().map(|s| s.product_id).collect();
        ids.extend(a.iter().map(|line| line.product_id));
        ids.extend(b.iter().map(|line| line.product_id));
        ids.sort_unstable();
        ids.dedup();
        self.products.get_products(&ids).await
    }

    async fn price_lines(&self, lines: &[BomLine]) -> Result<(Vec<PricedLine>, f64)> {
        let ids: Vec<Uuid> = lines.iter().map(|line| line.product_id).collect();
        let catalog = self.products.get_products(&ids).await?;

        let mut priced = Vec::with_capacity(lines.len());
        for line in lines {
            let product = catalog.get(&line.product_id).ok_or_else(|| {
                SunquoteError::InvalidInput(format!("unknown product {}", line.product_id))
            })?;
            priced.push(pricing::price_line(line, product));
        }
        let subtotal = pricing::subtotal(&priced);
        Ok((priced, subtotal))
    }
}

fn is_core(catalog: &HashMap<Uuid, Product>, product_id: Uuid) -> bool {
    catalog.get(&product_id).map(|p| p.category.is_core()).unwrap_or(false)
}
