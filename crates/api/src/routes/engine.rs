//! Simulation engine proxy endpoints
//!
//! All simulation, optimization, and financial modelling math runs in the
//! external engine; these handlers assemble the request and relay the
//! engine's JSON response unchanged. With no engine URL configured they
//! answer 503.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use sunquote_domain::types::{FinancialModelRequest, QuickSimulationRequest, SimulationRequest};

use crate::context::AppContext;
use crate::error::ApiResult;

pub async fn simulate(
    State(ctx): State<Arc<AppContext>>,
    Json(request): Json<SimulationRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    Ok(Json(ctx.engine.simulate(&request).await?))
}

/// Quick design: resolve and scale the stock profile, then simulate.
pub async fn quick_simulate(
    State(ctx): State<Arc<AppContext>>,
    Json(request): Json<QuickSimulationRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let simulation = ctx.profile_service.build_quick_simulation(&request).await?;
    Ok(Json(ctx.engine.simulate(&simulation).await?))
}

pub async fn optimize(
    State(ctx): State<Arc<AppContext>>,
    Json(request): Json<SimulationRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    Ok(Json(ctx.engine.optimize(&request).await?))
}

pub async fn financial_model(
    State(ctx): State<Arc<AppContext>>,
    Json(request): Json<FinancialModelRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    Ok(Json(ctx.engine.financial_model(&request).await?))
}
