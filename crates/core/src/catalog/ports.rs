//! Port interfaces for the product catalog

use async_trait::async_trait;
use std::collections::HashMap;
use sunquote_domain::types::{Product, ProductCategory};
use sunquote_domain::Result;
use uuid::Uuid;

/// Trait for reading catalog products
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Get a product by id
    async fn get_product(&self, id: Uuid) -> Result<Option<Product>>;

    /// Resolve a set of product ids, keyed by id. Missing ids are absent
    /// from the map; callers decide whether that is an error.
    async fn get_products(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, Product>>;

    /// List active products, optionally limited to one category.
    async fn list_products(&self, category: Option<ProductCategory>) -> Result<Vec<Product>>;

    /// Insert or update a catalog product.
    async fn upsert_product(&self, product: &Product) -> Result<()>;
}
