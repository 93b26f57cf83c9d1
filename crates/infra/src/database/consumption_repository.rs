//! SQLite-backed implementation of the `ConsumptionRepository` port.
//!
//! The parsed point series is stored as one JSON blob per project; uploads
//! replace wholesale, so row-level access is never needed.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, Row};
use sunquote_core::consumption::ports::ConsumptionRepository;
use sunquote_domain::types::{ConsumptionPoint, ConsumptionSeries};
use sunquote_domain::Result as DomainResult;
use tokio::task;
use uuid::Uuid;

use super::manager::DbManager;
use super::{datetime_from_sql, datetime_to_sql, json_from_sql, map_join_error, map_sql_error};

/// SQLite-backed consumption series repository.
pub struct SqliteConsumptionRepository {
    db: Arc<DbManager>,
}

impl SqliteConsumptionRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ConsumptionRepository for SqliteConsumptionRepository {
    async fn replace_series(&self, series: &ConsumptionSeries) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let series = series.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let points_json = serde_json::to_string(&series.points)
                .map_err(|e| sunquote_domain::SunquoteError::Internal(e.to_string()))?;
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT OR REPLACE INTO consumption_series
                    (project_id, source_filename, points_json, uploaded_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    series.project_id.to_string(),
                    series.source_filename,
                    points_json,
                    datetime_to_sql(series.uploaded_at),
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get_series(&self, project_id: Uuid) -> DomainResult<Option<ConsumptionSeries>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<ConsumptionSeries>> {
            let conn = db.get_connection()?;
            conn.query_row(
                "SELECT project_id, source_filename, points_json, uploaded_at
                 FROM consumption_series WHERE project_id = ?1",
                params![project_id.to_string()],
                map_series_row,
            )
            .optional()
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn delete_series(&self, project_id: Uuid) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "DELETE FROM consumption_series WHERE project_id = ?1",
                params![project_id.to_string()],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_series_row(row: &Row<'_>) -> rusqlite::Result<ConsumptionSeries> {
    let project_id: String = row.get(0)?;
    let points_json: String = row.get(2)?;
    let uploaded_at: String = row.get(3)?;

    let points: Vec<ConsumptionPoint> = json_from_sql(2, &points_json)?;

    Ok(ConsumptionSeries {
        project_id: super::uuid_from_sql(0, &project_id)?,
        source_filename: row.get(1)?,
        points,
        uploaded_at: datetime_from_sql(3, &uploaded_at)?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tempfile::TempDir;

    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn upload_replaces_previous_series() {
        let (repo, manager, _dir) = setup().await;
        let project_id = insert_project(&manager);

        let first = sample_series(project_id, 3, "march.csv");
        repo.replace_series(&first).await.expect("saved");

        let second = sample_series(project_id, 5, "april.csv");
        repo.replace_series(&second).await.expect("replaced");

        let loaded = repo.get_series(project_id).await.expect("fetched").expect("present");
        assert_eq!(loaded.points.len(), 5);
        assert_eq!(loaded.source_filename.as_deref(), Some("april.csv"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delete_clears_the_series() {
        let (repo, manager, _dir) = setup().await;
        let project_id = insert_project(&manager);
        repo.replace_series(&sample_series(project_id, 2, "data.csv")).await.expect("saved");

        repo.delete_series(project_id).await.expect("deleted");
        assert!(repo.get_series(project_id).await.expect("fetched").is_none());
    }

    async fn setup() -> (SqliteConsumptionRepository, Arc<DbManager>, TempDir) {
        let dir = TempDir::new().expect("temp dir created");
        let manager = Arc::new(
            DbManager::new(dir.path().join("consumption.db"), 4).expect("manager created"),
        );
        manager.run_migrations().expect("migrations run");
        (SqliteConsumptionRepository::new(manager.clone()), manager, dir)
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

    fn sample_series(project_id: Uuid, points: usize, filename: &str) -> ConsumptionSeries {
        let start = Utc::now();
        ConsumptionSeries {
            project_id,
            source_filename: Some(filename.into()),
            points: (0..points)
                .map(|i| ConsumptionPoint {
                    timestamp: start + chrono::Duration::minutes(30 * i as i64),
                    kw: 0.5 + i as f64 * 0.1,
                })
                .collect(),
            uploaded_at: Utc::now(),
        }
    }
}
