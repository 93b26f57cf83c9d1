//! Quote version and lifecycle endpoints
//!
//! Versions are immutable snapshots; PATCH and DELETE only work while a
//! quote is still Draft, and the only legal transitions are
//! Draft→Sent→Accepted|Declined. Anything else is a 409.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use sunquote_core::pagination::{
    paginate, quote_document_rows, standard_trailing_blocks, Page, PageLayout, RowHeights,
};
use sunquote_domain::types::QuoteVersion;
use uuid::Uuid;

use crate::context::AppContext;
use crate::error::ApiResult;

/// Draft metadata, used by both create and PATCH.
#[derive(Debug, Default, Deserialize)]
pub struct QuoteDetailsPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Pagination plan for the printable document.
#[derive(Debug, Serialize)]
pub struct LayoutResponse {
    pub page_count: usize,
    pub pages: Vec<Page>,
}

pub async fn create(
    State(ctx): State<Arc<AppContext>>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<QuoteDetailsPayload>,
) -> ApiResult<(StatusCode, Json<QuoteVersion>)> {
    let quote =
        ctx.quote_service.create_version(project_id, payload.title, payload.notes).await?;
    Ok((StatusCode::CREATED, Json(quote)))
}

pub async fn list(
    State(ctx): State<Arc<AppContext>>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<QuoteVersion>>> {
    Ok(Json(ctx.quote_service.list_for_project(project_id).await?))
}

pub async fn get(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<QuoteVersion>> {
    Ok(Json(ctx.quote_service.get(id).await?))
}

pub async fn update(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<QuoteDetailsPayload>,
) -> ApiResult<Json<QuoteVersion>> {
    Ok(Json(ctx.quote_service.update_draft(id, payload.title, payload.notes).await?))
}

pub async fn delete(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    ctx.quote_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn send(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<QuoteVersion>> {
    Ok(Json(ctx.quote_service.send(id).await?))
}

pub async fn accept(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<QuoteVersion>> {
    Ok(Json(ctx.quote_service.accept(id).await?))
}

pub async fn decline(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<QuoteVersion>> {
    Ok(Json(ctx.quote_service.decline(id).await?))
}

/// Compute the print pagination plan for a quote document.
pub async fn layout(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<LayoutResponse>> {
    let quote = ctx.quote_service.get(id).await?;

    let rows = quote_document_rows(&quote, &RowHeights::default());
    let blocks = standard_trailing_blocks();
    let pages = paginate(&rows, &blocks, &PageLayout::default());

    Ok(Json(LayoutResponse { page_count: pages.len(), pages }))
}
