//! Route handlers, one module per resource

pub mod bom;
pub mod energy;
pub mod engine;
pub mod health;
pub mod products;
pub mod profiles;
pub mod projects;
pub mod quotes;
pub mod templates;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::context::AppContext;

/// Assemble the full API router.
pub fn build_router(context: Arc<AppContext>) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/projects", get(projects::list).post(projects::create))
        .route("/api/projects/{id}", get(projects::get).put(projects::update))
        .route("/api/projects/{id}/bom", get(bom::get).put(bom::save))
        .route("/api/projects/{id}/bom/apply_template", post(bom::apply_template))
        .route("/api/products", get(products::list))
        .route("/api/bom_templates", get(templates::list).post(templates::create))
        .route("/api/load_profiles", get(profiles::list))
        .route("/api/load_profiles/{id}", get(profiles::get))
        .route("/api/projects/{id}/quotes", get(quotes::list).post(quotes::create))
        .route(
            "/api/quotes/{id}",
            get(quotes::get).patch(quotes::update).delete(quotes::delete),
        )
        .route("/api/quotes/{id}/send", post(quotes::send))
        .route("/api/quotes/{id}/accept", post(quotes::accept))
        .route("/api/quotes/{id}/decline", post(quotes::decline))
        .route("/api/quotes/{id}/layout", get(quotes::layout))
        .route(
            "/api/projects/{id}/energy_data",
            get(energy::get).post(energy::upload).delete(energy::delete),
        )
        .route("/api/simulate", post(engine::simulate))
        .route("/api/quick_simulate", post(engine::quick_simulate))
        .route("/api/optimize", post(engine::optimize))
        .route("/api/financial_model", post(engine::financial_model))
        .layer(TraceLayer::new_for_http())
        .with_state(context)
}
