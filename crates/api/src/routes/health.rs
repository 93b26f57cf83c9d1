//! Health endpoint

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use sunquote_domain::SunquoteError;

use crate::context::AppContext;
use crate::error::ApiResult;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub engine_configured: bool,
}

/// Liveness check: verifies the database answers a query and reports
/// whether a simulation engine is configured.
pub async fn health(State(ctx): State<Arc<AppContext>>) -> ApiResult<Json<HealthResponse>> {
    let db = Arc::clone(&ctx.db);
    tokio::task::spawn_blocking(move || db.health_check())
        .await
        .map_err(|e| SunquoteError::Internal(format!("health check task failed: {e}")))??;

    Ok(Json(HealthResponse {
        status: "ok",
        database: "ok",
        engine_configured: ctx.engine.is_configured(),
    }))
}
