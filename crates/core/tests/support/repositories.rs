//! In-memory mock repositories for core integration tests
//!
//! Each mock holds its state behind a `parking_lot::Mutex` so the tests
//! can observe writes made through the service layer.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use sunquote_core::bom::ports::{BomRepository, TemplateRepository};
use sunquote_core::catalog::ports::ProductRepository;
use sunquote_core::profile::ports::LoadProfileRepository;
use sunquote_core::project::ports::ProjectRepository;
use sunquote_core::quote::ports::QuoteRepository;
use sunquote_domain::types::{
    BomLine, BomTemplate, LoadProfile, Product, ProductCategory, Project, QuoteStatus,
    QuoteVersion,
};
use sunquote_domain::Result as DomainResult;
use uuid::Uuid;

/// In-memory mock for `ProductRepository`.
#[derive(Default, Clone)]
pub struct MockProductRepository {
    products: Arc<Mutex<HashMap<Uuid, Product>>>,
}

impl MockProductRepository {
    pub fn new(products: Vec<Product>) -> Self {
        let map = products.into_iter().map(|p| (p.id, p)).collect();
        Self { products: Arc::new(Mutex::new(map)) }
    }

    /// Overwrite one product's catalog cost, simulating a price change.
    pub fn set_cost(&self, id: Uuid, cost: f64) {
        if let Some(product) = self.products.lock().get_mut(&id) {
            product.cost = cost;
        }
    }
}

#[async_trait]
impl ProductRepository for MockProductRepository {
    async fn get_product(&self, id: Uuid) -> DomainResult<Option<Product>> {
        Ok(self.products.lock().get(&id).cloned())
    }

    async fn get_products(&self, ids: &[Uuid]) -> DomainResult<HashMap<Uuid, Product>> {
        let guard = self.products.lock();
        Ok(ids.iter().filter_map(|id| guard.get(id).map(|p| (*id, p.clone()))).collect())
    }

    async fn list_products(
        &self,
        category: Option<ProductCategory>,
    ) -> DomainResult<Vec<Product>> {
        let guard = self.products.lock();
        let mut products: Vec<Product> = guard
            .values()
            .filter(|p| p.active && category.map_or(true, |c| p.category == c))
            .cloned()
            .collect();
        products.sort_by(|a, b| a.brand.cmp(&b.brand).then(a.model.cmp(&b.model)));
        Ok(products)
    }

    async fn upsert_product(&self, product: &Product) -> DomainResult<()> {
        self.products.lock().insert(product.id, product.clone());
        Ok(())
    }
}

/// In-memory mock for `ProjectRepository`.
#[derive(Default, Clone)]
pub struct MockProjectRepository {
    projects: Arc<Mutex<HashMap<Uuid, Project>>>,
}

impl MockProjectRepository {
    pub fn new(projects: Vec<Project>) -> Self {
        let map = projects.into_iter().map(|p| (p.id, p)).collect();
        Self { projects: Arc::new(Mutex::new(map)) }
    }

    pub fn subtotal_of(&self, id: Uuid) -> Option<f64> {
        self.projects.lock().get(&id).and_then(|p| p.bom_subtotal)
    }
}

#[async_trait]
impl ProjectRepository for MockProjectRepository {
    async fn get_project(&self, id: Uuid) -> DomainResult<Option<Project>> {
        Ok(self.projects.lock().get(&id).cloned())
    }

    async fn list_projects(&self) -> DomainResult<Vec<Project>> {
        let mut projects: Vec<Project> = self.projects.lock().values().cloned().collect();
        projects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(projects)
    }

    async fn upsert_project(&self, project: &Project) -> DomainResult<()> {
        self.projects.lock().insert(project.id, project.clone());
        Ok(())
    }

    async fn set_bom_subtotal(&self, project_id: Uuid, subtotal: f64) -> DomainResult<()> {
        if let Some(project) = self.projects.lock().get_mut(&project_id) {
            project.bom_subtotal = Some(subtotal);
        }
        Ok(())
    }
}

/// In-memory mock for `BomRepository`.
#[derive(Default, Clone)]
pub struct MockBomRepository {
    lines: Arc<Mutex<HashMap<Uuid, Vec<BomLine>>>>,
}

#[async_trait]
impl BomRepository for MockBomRepository {
    async fn get_lines(&self, project_id: Uuid) -> DomainResult<Vec<BomLine>> {
        Ok(self.lines.lock().get(&project_id).cloned().unwrap_or_default())
    }

    async fn replace_lines(&self, project_id: Uuid, lines: &[BomLine]) -> DomainResult<()> {
        self.lines.lock().insert(project_id, lines.to_vec());
        Ok(())
    }
}

/// In-memory mock for `TemplateRepository`.
#[derive(Default, Clone)]
pub struct MockTemplateRepository {
    templates: Arc<Mutex<Vec<BomTemplate>>>,
}

#[async_trait]
impl TemplateRepository for MockTemplateRepository {
    async fn save_template(&self, template: &BomTemplate) -> DomainResult<()> {
        self.templates.lock().push(template.clone());
        Ok(())
    }

    async fn get_template(&self, id: Uuid) -> DomainResult<Option<BomTemplate>> {
        Ok(self.templates.lock().iter().find(|t| t.id == id).cloned())
    }

    async fn list_templates(&self) -> DomainResult<Vec<BomTemplate>> {
        let mut templates = self.templates.lock().clone();
        templates.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(templates)
    }
}

/// In-memory mock for `QuoteRepository`.
#[derive(Default, Clone)]
pub struct MockQuoteRepository {
    quotes: Arc<Mutex<HashMap<Uuid, QuoteVersion>>>,
}

#[async_trait]
impl QuoteRepository for MockQuoteRepository {
    async fn insert_version(&self, quote: &QuoteVersion) -> DomainResult<()> {
        self.quotes.lock().insert(quote.id, quote.clone());
        Ok(())
    }

    async fn get_quote(&self, id: Uuid) -> DomainResult<Option<QuoteVersion>> {
        Ok(self.quotes.lock().get(&id).cloned())
    }

    async fn list_for_project(&self, project_id: Uuid) -> DomainResult<Vec<QuoteVersion>> {
        let mut quotes: Vec<QuoteVersion> = self
            .quotes
            .lock()
            .values()
            .filter(|q| q.project_id == project_id)
            .cloned()
            .collect();
        quotes.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(quotes)
    }

    async fn latest_version_number(&self, project_id: Uuid) -> DomainResult<u32> {
        Ok(self
            .quotes
            .lock()
            .values()
            .filter(|q| q.project_id == project_id)
            .map(|q| q.version)
            .max()
            .unwrap_or(0))
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: QuoteStatus,
        sent_at: Option<DateTime<Utc>>,
        decided_at: Option<DateTime<Utc>>,
    ) -> DomainResult<()> {
        if let Some(quote) = self.quotes.lock().get_mut(&id) {
            quote.status = status;
            quote.sent_at = sent_at;
            quote.decided_at = decided_at;
        }
        Ok(())
    }

    async fn update_draft_details(
        &self,
        id: Uuid,
        title: Option<String>,
        notes: Option<String>,
    ) -> DomainResult<()> {
        if let Some(quote) = self.quotes.lock().get_mut(&id) {
            quote.title = title;
            quote.notes = notes;
        }
        Ok(())
    }

    async fn delete_quote(&self, id: Uuid) -> DomainResult<()> {
        self.quotes.lock().remove(&id);
        Ok(())
    }

    async fn has_sent_version(&self, project_id: Uuid) -> DomainResult<bool> {
        Ok(self
            .quotes
            .lock()
            .values()
            .any(|q| q.project_id == project_id && q.status != QuoteStatus::Draft))
    }
}

/// In-memory mock for `LoadProfileRepository`.
#[derive(Default, Clone)]
pub struct MockLoadProfileRepository {
    profiles: Arc<Mutex<HashMap<Uuid, LoadProfile>>>,
}

impl MockLoadProfileRepository {
    pub fn new(profiles: Vec<LoadProfile>) -> Self {
        let map = profiles.into_iter().map(|p| (p.id, p)).collect();
        Self { profiles: Arc::new(Mutex::new(map)) }
    }
}

#[async_trait]
impl LoadProfileRepository for MockLoadProfileRepository {
    async fn list_profiles(&self) -> DomainResult<Vec<LoadProfile>> {
        let mut profiles: Vec<LoadProfile> = self.profiles.lock().values().cloned().collect();
        profiles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(profiles)
    }

    async fn get_profile(&self, id: Uuid) -> DomainResult<Option<LoadProfile>> {
        Ok(self.profiles.lock().get(&id).cloned())
    }

    async fn upsert_profile(&self, profile: &LoadProfile) -> DomainResult<()> {
        self.profiles.lock().insert(profile.id, profile.clone());
        Ok(())
    }
}
