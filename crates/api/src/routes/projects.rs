//! Project intake and system design endpoints
//!
//! Saving a design re-derives the core BOM lines: panel, inverter, and
//! battery lines always mirror the stored system, while non-core lines and
//! surviving pricing overrides are left alone.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use sunquote_domain::types::{DesignType, Project, SystemDesign};
use sunquote_domain::SunquoteError;
use uuid::Uuid;

use crate::context::AppContext;
use crate::error::ApiResult;

/// Intake fields plus the system design, shared by create and update.
#[derive(Debug, Deserialize)]
pub struct ProjectPayload {
    pub client_name: String,
    pub site_address: String,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub tariff_id: Option<String>,
    pub design_type: DesignType,
    #[serde(default)]
    pub system: SystemDesign,
}

impl ProjectPayload {
    fn validate(&self) -> ApiResult<()> {
        if self.client_name.trim().is_empty() {
            return Err(SunquoteError::Validation("client name is required".into()).into());
        }
        if self.site_address.trim().is_empty() {
            return Err(SunquoteError::Validation("site address is required".into()).into());
        }
        Ok(())
    }
}

pub async fn list(State(ctx): State<Arc<AppContext>>) -> ApiResult<Json<Vec<Project>>> {
    Ok(Json(ctx.projects.list_projects().await?))
}

pub async fn get(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Project>> {
    Ok(Json(load_project(&ctx, id).await?))
}

pub async fn create(
    State(ctx): State<Arc<AppContext>>,
    Json(payload): Json<ProjectPayload>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    payload.validate()?;

    let now = Utc::now();
    let project = Project {
        id: Uuid::new_v4(),
        client_name: payload.client_name.trim().to_string(),
        site_address: payload.site_address.trim().to_string(),
        contact_email: payload.contact_email,
        contact_phone: payload.contact_phone,
        tariff_id: payload.tariff_id,
        design_type: payload.design_type,
        system: payload.system,
        bom_subtotal: None,
        created_at: now,
        updated_at: now,
    };
    ctx.projects.upsert_project(&project).await?;

    if !project.system.selections().is_empty() {
        ctx.bom_service.apply_design_change(&project).await?;
    }

    let stored = load_project(&ctx, project.id).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn update(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProjectPayload>,
) -> ApiResult<Json<Project>> {
    payload.validate()?;
    let existing = load_project(&ctx, id).await?;

    let project = Project {
        id,
        client_name: payload.client_name.trim().to_string(),
        site_address: payload.site_address.trim().to_string(),
        contact_email: payload.contact_email,
        contact_phone: payload.contact_phone,
        tariff_id: payload.tariff_id,
        design_type: payload.design_type,
        system: payload.system,
        bom_subtotal: existing.bom_subtotal,
        created_at: existing.created_at,
        updated_at: Utc::now(),
    };
    ctx.projects.upsert_project(&project).await?;

    // The design is authoritative for core lines, so every save re-derives
    // them. Non-core lines and surviving overrides are untouched.
    ctx.bom_service.apply_design_change(&project).await?;

    Ok(Json(load_project(&ctx, id).await?))
}

async fn load_project(ctx: &AppContext, id: Uuid) -> ApiResult<Project> {
    ctx.projects
        .get_project(id)
        .await?
        .ok_or_else(|| SunquoteError::NotFound(format!("project {id}")).into())
}
