//! Reusable BOM template endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use sunquote_domain::types::BomTemplate;
use uuid::Uuid;

use crate::context::AppContext;
use crate::error::ApiResult;

/// Capture a project's current non-core lines as a named template.
#[derive(Debug, Deserialize)]
pub struct CreateTemplatePayload {
    pub project_id: Uuid,
    pub name: String,
}

pub async fn list(State(ctx): State<Arc<AppContext>>) -> ApiResult<Json<Vec<BomTemplate>>> {
    Ok(Json(ctx.templates.list_templates().await?))
}

pub async fn create(
    State(ctx): State<Arc<AppContext>>,
    Json(payload): Json<CreateTemplatePayload>,
) -> ApiResult<(StatusCode, Json<BomTemplate>)> {
    let template = ctx.bom_service.save_template(payload.project_id, &payload.name).await?;
    Ok((StatusCode::CREATED, Json(template)))
}
