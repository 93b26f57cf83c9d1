//! Product catalog endpoints

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use sunquote_core::search_products;
use sunquote_domain::types::{Product, ProductCategory};
use sunquote_domain::SunquoteError;

use crate::context::AppContext;
use crate::error::ApiResult;

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    /// Free-text fuzzy search over brand, model, and category.
    pub q: Option<String>,
    /// Storage identifier of a category to limit results to.
    pub category: Option<String>,
}

pub async fn list(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<ProductQuery>,
) -> ApiResult<Json<Vec<Product>>> {
    let category = match query.category.as_deref() {
        Some(raw) => Some(ProductCategory::parse(raw).ok_or_else(|| {
            SunquoteError::InvalidInput(format!("unknown product category {raw:?}"))
        })?),
        None => None,
    };

    let mut products = ctx.products.list_products(category).await?;
    if let Some(q) = query.q.as_deref() {
        products = search_products(products, q);
    }
    Ok(Json(products))
}
