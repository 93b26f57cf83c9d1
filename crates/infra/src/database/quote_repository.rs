//! SQLite-backed implementation of the `QuoteRepository` port.
//!
//! Snapshot lines are written once at insert and never updated; lifecycle
//! changes only touch the quote header row.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use sunquote_core::quote::ports::QuoteRepository;
use sunquote_domain::types::{ProductCategory, QuoteLine, QuoteStatus, QuoteVersion};
use sunquote_domain::Result as DomainResult;
use tokio::task;
use uuid::Uuid;

use super::manager::DbManager;
use super::{datetime_from_sql, datetime_to_sql, map_join_error, map_sql_error, uuid_from_sql};

/// SQLite-backed quote repository.
pub struct SqliteQuoteRepository {
    db: Arc<DbManager>,
}

impl SqliteQuoteRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl QuoteRepository for SqliteQuoteRepository {
    async fn insert_version(&self, quote: &QuoteVersion) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let quote = quote.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let mut conn = db.get_connection()?;
            let tx = conn.transaction().map_err(map_sql_error)?;
            tx.execute(
                QUOTE_INSERT,
                params![
                    quote.id.to_string(),
                    quote.project_id.to_string(),
                    i64::from(quote.version),
                    quote.status.as_str(),
                    quote.title,
                    quote.notes,
                    quote.subtotal,
                    datetime_to_sql(quote.created_at),
                    quote.sent_at.map(datetime_to_sql),
                    quote.decided_at.map(datetime_to_sql),
                ],
            )
            .map_err(map_sql_error)?;
            for (position, line) in quote.lines.iter().enumerate() {
                tx.execute(
                    QUOTE_LINE_INSERT,
                    params![
                        quote.id.to_string(),
                        position as i64,
                        line.product_id.to_string(),
                        line.category.as_str(),
                        line.description,
                        i64::from(line.quantity),
                        line.unit_cost,
                        line.margin,
                        line.unit_price,
                        line.line_total,
                    ],
                )
                .map_err(map_sql_error)?;
            }
            tx.commit().map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get_quote(&self, id: Uuid) -> DomainResult<Option<QuoteVersion>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<QuoteVersion>> {
            let conn = db.get_connection()?;
            let header = conn
                .query_row(QUOTE_SELECT_BY_ID, params![id.to_string()], map_quote_header)
                .optional()
                .map_err(map_sql_error)?;

            match header {
                Some(mut quote) => {
                    quote.lines = quote_lines(&conn, id)?;
                    Ok(Some(quote))
                }
                None => Ok(None),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_for_project(&self, project_id: Uuid) -> DomainResult<Vec<QuoteVersion>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<QuoteVersion>> {
            let conn = db.get_connection()?;
            let mut stmt = conn.prepare(QUOTE_SELECT_FOR_PROJECT).map_err(map_sql_error)?;
            let mut quotes = stmt
                .query_map(params![project_id.to_string()], map_quote_header)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;

            for quote in &mut quotes {
                quote.lines = quote_lines(&conn, quote.id)?;
            }
            Ok(quotes)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn latest_version_number(&self, project_id: Uuid) -> DomainResult<u32> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<u32> {
            let conn = db.get_connection()?;
            let latest: Option<i64> = conn
                .query_row(
                    "SELECT MAX(version) FROM quotes WHERE project_id = ?1",
                    params![project_id.to_string()],
                    |row| row.get(0),
                )
                .map_err(map_sql_error)?;
            Ok(latest.and_then(|v| u32::try_from(v).ok()).unwrap_or(0))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: QuoteStatus,
        sent_at: Option<DateTime<Utc>>,
        decided_at: Option<DateTime<Utc>>,
    ) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "UPDATE quotes SET status = ?1, sent_at = ?2, decided_at = ?3 WHERE id = ?4",
                params![
                    status.as_str(),
                    sent_at.map(datetime_to_sql),
                    decided_at.map(datetime_to_sql),
                    id.to_string(),
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update_draft_details(
        &self,
        id: Uuid,
        title: Option<String>,
        notes: Option<String>,
    ) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "UPDATE quotes SET title = ?1, notes = ?2 WHERE id = ?3",
                params![title, notes, id.to_string()],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn delete_quote(&self, id: Uuid) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute("DELETE FROM quotes WHERE id = ?1", params![id.to_string()])
                .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn has_sent_version(&self, project_id: Uuid) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = db.get_connection()?;
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM quotes WHERE project_id = ?1 AND status != 'draft'",
                    params![project_id.to_string()],
                    |row| row.get(0),
                )
                .map_err(map_sql_error)?;
            Ok(count > 0)
        })
        .await
        .map_err(map_join_error)?
    }
}

const QUOTE_INSERT: &str = "INSERT INTO quotes (
        id, project_id, version, status, title, notes, subtotal,
        created_at, sent_at, decided_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";

const QUOTE_LINE_INSERT: &str = "INSERT INTO quote_lines (
        quote_id, position, product_id, category, description, quantity,
        unit_cost, margin, unit_price, line_total
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";

const QUOTE_SELECT_BY_ID: &str = "SELECT
        id, project_id, version, status, title, notes, subtotal,
        created_at, sent_at, decided_at
    FROM quotes WHERE id = ?1";

const QUOTE_SELECT_FOR_PROJECT: &str = "SELECT
        id, project_id, version, status, title, notes, subtotal,
        created_at, sent_at, decided_at
    FROM quotes WHERE project_id = ?1 ORDER BY version DESC";

fn map_quote_header(row: &Row<'_>) -> rusqlite::Result<QuoteVersion> {
    let id: String = row.get(0)?;
    let project_id: String = row.get(1)?;
    let version: i64 = row.get(2)?;
    let status: String = row.get(3)?;
    let created_at: String = row.get(7)?;
    let sent_at: Option<String> = row.get(8)?;
    let decided_at: Option<String> = row.get(9)?;

    let status = QuoteStatus::parse(&status).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            format!("unknown quote status {status:?}").into(),
        )
    })?;

    Ok(QuoteVersion {
        id: uuid_from_sql(0, &id)?,
        project_id: uuid_from_sql(1, &project_id)?,
        version: u32::try_from(version).unwrap_or(0),
        status,
        title: row.get(4)?,
        notes: row.get(5)?,
        lines: Vec::new(),
        subtotal: row.get(6)?,
        created_at: datetime_from_sql(7, &created_at)?,
        sent_at: sent_at.as_deref().map(|v| datetime_from_sql(8, v)).transpose()?,
        decided_at: decided_at.as_deref().map(|v| datetime_from_sql(9, v)).transpose()?,
    })
}

fn quote_lines(conn: &Connection, quote_id: Uuid) -> DomainResult<Vec<QuoteLine>> {
    let mut stmt = conn
        .prepare(
            "SELECT product_id, category, description, quantity, unit_cost, margin,
                    unit_price, line_total
             FROM quote_lines WHERE quote_id = ?1 ORDER BY position",
        )
        .map_err(map_sql_error)?;
    let lines = stmt
        .query_map(params![quote_id.to_string()], map_quote_line_row)
        .map_err(map_sql_error)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(map_sql_error)?;
    Ok(lines)
}

fn map_quote_line_row(row: &Row<'_>) -> rusqlite::Result<QuoteLine> {
    let product_id: String = row.get(0)?;
    let category: String = row.get(1)?;
    let quantity: i64 = row.get(3)?;

    let category = ProductCategory::parse(&category).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            format!("unknown product category {category:?}").into(),
        )
    })?;

    Ok(QuoteLine {
        product_id: uuid_from_sql(0, &product_id)?,
        category,
        description: row.get(2)?,
        quantity: u32::try_from(quantity).unwrap_or(0),
        unit_cost: row.get(4)?,
        margin: row.get(5)?,
        unit_price: row.get(6)?,
        line_total: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn roundtrips_a_version_with_lines() {
        let (repo, manager, _dir) = setup().await;
        let project_id = insert_project(&manager);
        let quote = sample_quote(project_id, 1);

        repo.insert_version(&quote).await.expect("inserted");

        let loaded = repo.get_quote(quote.id).await.expect("fetched").expect("present");
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.status, QuoteStatus::Draft);
        assert_eq!(loaded.lines.len(), 2);
        assert_eq!(loaded.lines[0].description, "SunPeak SP-450");
        assert!((loaded.subtotal - quote.subtotal).abs() < 1e-9);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn version_numbering_and_listing() {
        let (repo, manager, _dir) = setup().await;
        let project_id = insert_project(&manager);

        assert_eq!(repo.latest_version_number(project_id).await.expect("latest"), 0);

        repo.insert_version(&sample_quote(project_id, 1)).await.expect("v1");
        repo.insert_version(&sample_quote(project_id, 2)).await.expect("v2");

        assert_eq!(repo.latest_version_number(project_id).await.expect("latest"), 2);
        let listed = repo.list_for_project(project_id).await.expect("listed");
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].version, 2);
        assert_eq!(listed[0].lines.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn status_update_and_sent_detection() {
        let (repo, manager, _dir) = setup().await;
        let project_id = insert_project(&manager);
        let quote = sample_quote(project_id, 1);
        repo.insert_version(&quote).await.expect("inserted");

        assert!(!repo.has_sent_version(project_id).await.expect("checked"));

        let now = Utc::now();
        repo.update_status(quote.id, QuoteStatus::Sent, Some(now), None).await.expect("sent");

        assert!(repo.has_sent_version(project_id).await.expect("checked"));
        let loaded = repo.get_quote(quote.id).await.expect("fetched").expect("present");
        assert_eq!(loaded.status, QuoteStatus::Sent);
        assert!(loaded.sent_at.is_some());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delete_removes_version_and_lines() {
        let (repo, manager, _dir) = setup().await;
        let project_id = insert_project(&manager);
        let quote = sample_quote(project_id, 1);
        repo.insert_version(&quote).await.expect("inserted");

        repo.delete_quote(quote.id).await.expect("deleted");
        assert!(repo.get_quote(quote.id).await.expect("fetched").is_none());

        let conn = manager.get_connection().expect("connection");
        let orphans: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM quote_lines WHERE quote_id = ?1",
                params![quote.id.to_string()],
                |row| row.get(0),
            )
            .expect("counted");
        assert_eq!(orphans, 0);
    }

    async fn setup() -> (SqliteQuoteRepository, Arc<DbManager>, TempDir) {
        let dir = TempDir::new().expect("temp dir created");
        let manager =
            Arc::new(DbManager::new(dir.path().join("quotes.db"), 4).expect("manager created"));
        manager.run_migrations().expect("migrations run");
        (SqliteQuoteRepository::new(manager.clone()), manager, dir)
    }

    fn insert_project(manager: &Arc<DbManager>) -> Uuid {
        let id = Uuid::new_v4();
        let conn = manager.get_connection().expect("connection");
        let now = datetime_to_sql(Utc::now());
        conn.execute(
            "INSERT INTO projects (id, client_name, site_address, design_type, system_json,
                created_at, updated_at)
             VALUES (?1, 'Client', 'Site', 'full', '{}', ?2, ?2)",
            params![id.to_string(), now],
        )
        .expect("project inserted");
        id
    }

    fn sample_quote(project_id: Uuid, version: u32) -> QuoteVersion {
        let lines = vec![
            QuoteLine {
                product_id: Uuid::new_v4(),
                category: ProductCategory::Panel,
                description: "SunPeak SP-450".into(),
                quantity: 10,
                unit_cost: 200.0,
                margin: 0.25,
                unit_price: 250.0,
                line_total: 2500.0,
            },
            QuoteLine {
                product_id: Uuid::new_v4(),
                category: ProductCategory::Inverter,
                description: "VoltEdge VE-5000".into(),
                quantity: 1,
                unit_cost: 1000.0,
                margin: 0.25,
                unit_price: 1250.0,
                line_total: 1250.0,
            },
        ];
        let subtotal = lines.iter().map(|l| l.line_total).sum();
        QuoteVersion {
            id: Uuid::new_v4(),
            project_id,
            version,
            status: QuoteStatus::Draft,
            title: Some(format!("Quote v{version}")),
            notes: None,
            lines,
            subtotal,
            created_at: Utc::now(),
            sent_at: None,
            decided_at: None,
        }
    }
}
