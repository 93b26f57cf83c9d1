//! Application context - dependency injection container

use std::sync::Arc;

use sunquote_core::bom::ports::{BomRepository, TemplateRepository};
use sunquote_core::catalog::ports::ProductRepository;
use sunquote_core::consumption::ConsumptionRepository;
use sunquote_core::profile::ports::LoadProfileRepository;
use sunquote_core::project::ports::ProjectRepository;
use sunquote_core::quote::ports::QuoteRepository;
use sunquote_core::{BomService, ProfileService, QuoteService};
use sunquote_domain::{Config, Result};
use sunquote_infra::database::{
    SqliteBomRepository, SqliteConsumptionRepository, SqliteLoadProfileRepository,
    SqliteProductRepository, SqliteProjectRepository, SqliteQuoteRepository,
    SqliteTemplateRepository,
};
use sunquote_infra::{DbManager, EngineClient};

/// Application context - holds the repositories, services, and clients the
/// route handlers work through.
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,

    // Repositories handlers use directly
    pub projects: Arc<dyn ProjectRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub templates: Arc<dyn TemplateRepository>,
    pub profiles: Arc<dyn LoadProfileRepository>,
    pub consumption: Arc<dyn ConsumptionRepository>,

    // Services
    pub bom_service: Arc<BomService>,
    pub quote_service: Arc<QuoteService>,
    pub profile_service: Arc<ProfileService>,

    // External simulation engine
    pub engine: EngineClient,
}

impl AppContext {
    /// Build the full dependency graph from configuration.
    ///
    /// Opens the database, runs migrations, and wires every repository and
    /// service. Fail-fast: any storage or config problem aborts startup.
    pub fn new(config: Config) -> Result<Arc<Self>> {
        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
        db.run_migrations()?;

        let projects: Arc<dyn ProjectRepository> =
            Arc::new(SqliteProjectRepository::new(Arc::clone(&db)));
        let products: Arc<dyn ProductRepository> =
            Arc::new(SqliteProductRepository::new(Arc::clone(&db)));
        let boms: Arc<dyn BomRepository> = Arc::new(SqliteBomRepository::new(Arc::clone(&db)));
        let templates: Arc<dyn TemplateRepository> =
            Arc::new(SqliteTemplateRepository::new(Arc::clone(&db)));
        let quotes: Arc<dyn QuoteRepository> =
            Arc::new(SqliteQuoteRepository::new(Arc::clone(&db)));
        let profiles: Arc<dyn LoadProfileRepository> =
            Arc::new(SqliteLoadProfileRepository::new(Arc::clone(&db)));
        let consumption: Arc<dyn ConsumptionRepository> =
            Arc::new(SqliteConsumptionRepository::new(Arc::clone(&db)));

        let bom_service = Arc::new(BomService::new(
            Arc::clone(&boms),
            Arc::clone(&products),
            Arc::clone(&projects),
            Arc::clone(&templates),
            Arc::clone(&quotes),
        ));
        let quote_service = Arc::new(QuoteService::new(
            Arc::clone(&quotes),
            Arc::clone(&boms),
            Arc::clone(&products),
            Arc::clone(&projects),
        ));
        let profile_service = Arc::new(ProfileService::new(Arc::clone(&profiles)));

        let engine = EngineClient::from_config(&config.engine)?;

        Ok(Arc::new(Self {
            config,
            db,
            projects,
            products,
            templates,
            profiles,
            consumption,
            bom_service,
            quote_service,
            profile_service,
            engine,
        }))
    }
}
