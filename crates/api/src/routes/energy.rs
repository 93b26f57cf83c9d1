//! Uploaded consumption data endpoints
//!
//! CSV bodies are parsed server-side; a project holds at most one series,
//! so each upload replaces the previous one.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sunquote_core::consumption::parse_csv;
use sunquote_domain::types::ConsumptionSeries;
use sunquote_domain::SunquoteError;
use uuid::Uuid;

use crate::context::AppContext;
use crate::error::ApiResult;

#[derive(Debug, Default, Deserialize)]
pub struct UploadQuery {
    /// Original filename, kept for display alongside the series.
    pub filename: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub project_id: Uuid,
    pub points: usize,
}

pub async fn upload(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<Uuid>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    require_project(&ctx, id).await?;

    let points = parse_csv(&body)?;
    let series = ConsumptionSeries {
        project_id: id,
        source_filename: query.filename,
        points,
        uploaded_at: Utc::now(),
    };
    ctx.consumption.replace_series(&series).await?;

    tracing::info!(project_id = %id, points = series.points.len(), "consumption data uploaded");
    Ok((
        StatusCode::CREATED,
        Json(UploadResponse { project_id: id, points: series.points.len() }),
    ))
}

pub async fn get(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ConsumptionSeries>> {
    require_project(&ctx, id).await?;
    ctx.consumption
        .get_series(id)
        .await?
        .map(Json)
        .ok_or_else(|| SunquoteError::NotFound(format!("consumption data for project {id}")).into())
}

pub async fn delete(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    require_project(&ctx, id).await?;
    ctx.consumption.delete_series(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn require_project(ctx: &AppContext, id: Uuid) -> ApiResult<()> {
    ctx.projects
        .get_project(id)
        .await?
        .map(|_| ())
        .ok_or_else(|| SunquoteError::NotFound(format!("project {id}")).into())
}
