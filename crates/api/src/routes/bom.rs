//! Bill-of-materials endpoints

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use sunquote_core::{PricedLine, SavedBom};
use sunquote_domain::types::{BomLine, BomMode};
use uuid::Uuid;

use crate::context::AppContext;
use crate::error::ApiResult;

/// Incoming BOM save: the editing mode plus the full line list.
#[derive(Debug, Deserialize)]
pub struct SaveBomPayload {
    pub mode: BomMode,
    pub lines: Vec<BomLine>,
}

#[derive(Debug, Deserialize)]
pub struct ApplyTemplatePayload {
    pub template_id: Uuid,
}

/// A priced BOM as the frontend consumes it.
#[derive(Debug, Serialize)]
pub struct BomResponse {
    pub lines: Vec<BomLine>,
    pub priced: Vec<PricedLine>,
    pub subtotal: f64,
}

impl From<SavedBom> for BomResponse {
    fn from(saved: SavedBom) -> Self {
        Self { lines: saved.lines, priced: saved.priced, subtotal: saved.subtotal }
    }
}

pub async fn get(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<BomResponse>> {
    let saved = ctx.bom_service.priced_bom(id).await?;
    Ok(Json(saved.into()))
}

pub async fn save(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SaveBomPayload>,
) -> ApiResult<Json<BomResponse>> {
    let saved = ctx.bom_service.save_bom(id, payload.mode, payload.lines).await?;
    Ok(Json(saved.into()))
}

pub async fn apply_template(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApplyTemplatePayload>,
) -> ApiResult<Json<BomResponse>> {
    let saved = ctx.bom_service.apply_template(id, payload.template_id).await?;
    Ok(Json(saved.into()))
}
