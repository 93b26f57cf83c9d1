//! Stock load profile endpoints

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use sunquote_domain::types::LoadProfile;
use uuid::Uuid;

use crate::context::AppContext;
use crate::error::ApiResult;

#[derive(Debug, Default, Deserialize)]
pub struct ProfileQuery {
    /// Optional scale factor; must be positive when present.
    pub multiplier: Option<f64>,
}

pub async fn list(State(ctx): State<Arc<AppContext>>) -> ApiResult<Json<Vec<LoadProfile>>> {
    Ok(Json(ctx.profile_service.list().await?))
}

pub async fn get(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<Uuid>,
    Query(query): Query<ProfileQuery>,
) -> ApiResult<Json<LoadProfile>> {
    let profile = match query.multiplier {
        Some(multiplier) => ctx.profile_service.scaled(id, multiplier).await?,
        None => ctx.profile_service.get(id).await?,
    };
    Ok(Json(profile))
}
