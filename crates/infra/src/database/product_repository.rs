//! SQLite-backed implementation of the `ProductRepository` port.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};
use sunquote_core::catalog::ports::ProductRepository;
use sunquote_domain::types::{Product, ProductCategory};
use sunquote_domain::Result as DomainResult;
use tokio::task;
use uuid::Uuid;

use super::manager::DbManager;
use super::{datetime_from_sql, datetime_to_sql, map_join_error, map_sql_error, uuid_from_sql};

/// SQLite-backed catalog repository.
pub struct SqliteProductRepository {
    db: Arc<DbManager>,
}

impl SqliteProductRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for SqliteProductRepository {
    async fn get_product(&self, id: Uuid) -> DomainResult<Option<Product>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<Product>> {
            let conn = db.get_connection()?;
            conn.query_row(PRODUCT_SELECT_BY_ID, params![id.to_string()], map_product_row)
                .optional()
                .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get_products(&self, ids: &[Uuid]) -> DomainResult<HashMap<Uuid, Product>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let ids: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<HashMap<Uuid, Product>> {
            let conn = db.get_connection()?;
            let placeholders = vec!["?"; ids.len()].join(", ");
            let sql = format!("{PRODUCT_SELECT_PREFIX} WHERE id IN ({placeholders})");
            let mut stmt = conn.prepare(&sql).map_err(map_sql_error)?;

            let params: Vec<&dyn ToSql> = ids.iter().map(|id| id as &dyn ToSql).collect();
            let rows = stmt
                .query_map(params.as_slice(), map_product_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;

            Ok(rows.into_iter().map(|p| (p.id, p)).collect())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_products(
        &self,
        category: Option<ProductCategory>,
    ) -> DomainResult<Vec<Product>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<Product>> {
            let conn = db.get_connection()?;
            let rows = match category {
                Some(category) => {
                    let sql = format!(
                        "{PRODUCT_SELECT_PREFIX} WHERE active = 1 AND category = ?1
                         ORDER BY brand, model"
                    );
                    query_products(&conn, &sql, params![category.as_str()])
                }
                None => {
                    let sql =
                        format!("{PRODUCT_SELECT_PREFIX} WHERE active = 1 ORDER BY brand, model");
                    query_products(&conn, &sql, params![])
                }
            }?;
            Ok(rows)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn upsert_product(&self, product: &Product) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let product = product.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                PRODUCT_INSERT,
                params![
                    product.id.to_string(),
                    product.category.as_str(),
                    product.brand,
                    product.model,
                    product.cost,
                    product.margin,
                    product.power_w,
                    product.rating_kva,
                    product.capacity_kwh,
                    i64::from(product.active),
                    datetime_to_sql(product.updated_at),
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

const PRODUCT_SELECT_PREFIX: &str = "SELECT
        id, category, brand, model, cost, margin, power_w, rating_kva, capacity_kwh,
        active, updated_at
    FROM products";

const PRODUCT_SELECT_BY_ID: &str = "SELECT
        id, category, brand, model, cost, margin, power_w, rating_kva, capacity_kwh,
        active, updated_at
    FROM products WHERE id = ?1";

const PRODUCT_INSERT: &str = "INSERT OR REPLACE INTO products (
        id, category, brand, model, cost, margin, power_w, rating_kva, capacity_kwh,
        active, updated_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)";

fn query_products(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> DomainResult<Vec<Product>> {
    let mut stmt = conn.prepare(sql).map_err(map_sql_error)?;
    let products = stmt
        .query_map(params, map_product_row)
        .map_err(map_sql_error)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(map_sql_error)?;
    Ok(products)
}

fn map_product_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    let id: String = row.get(0)?;
    let category: String = row.get(1)?;
    let updated_at: String = row.get(10)?;

    let category = ProductCategory::parse(&category).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            format!("unknown product category {category:?}").into(),
        )
    })?;

    Ok(Product {
        id: uuid_from_sql(0, &id)?,
        category,
        brand: row.get(2)?,
        model: row.get(3)?,
        cost: row.get(4)?,
        margin: row.get(5)?,
        power_w: row.get(6)?,
        rating_kva: row.get(7)?,
        capacity_kwh: row.get(8)?,
        active: row.get::<_, i64>(9)? != 0,
        updated_at: datetime_from_sql(10, &updated_at)?,
    })
}
