//! SQLite-backed implementation of the `LoadProfileRepository` port.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, Row};
use sunquote_core::profile::ports::LoadProfileRepository;
use sunquote_domain::types::LoadProfile;
use sunquote_domain::Result as DomainResult;
use tokio::task;
use uuid::Uuid;

use super::manager::DbManager;
use super::{json_from_sql, map_join_error, map_sql_error, uuid_from_sql};

/// SQLite-backed stock load profile repository.
pub struct SqliteLoadProfileRepository {
    db: Arc<DbManager>,
}

impl SqliteLoadProfileRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LoadProfileRepository for SqliteLoadProfileRepository {
    async fn list_profiles(&self) -> DomainResult<Vec<LoadProfile>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<LoadProfile>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(
                    "SELECT id, name, description, interval_minutes, values_json
                     FROM load_profiles ORDER BY name",
                )
                .map_err(map_sql_error)?;
            let profiles = stmt
                .query_map([], map_profile_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            Ok(profiles)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get_profile(&self, id: Uuid) -> DomainResult<Option<LoadProfile>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<LoadProfile>> {
            let conn = db.get_connection()?;
            conn.query_row(
                "SELECT id, name, description, interval_minutes, values_json
                 FROM load_profiles WHERE id = ?1",
                params![id.to_string()],
                map_profile_row,
            )
            .optional()
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn upsert_profile(&self, profile: &LoadProfile) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let profile = profile.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let values_json = serde_json::to_string(&profile.values)
                .map_err(|e| sunquote_domain::SunquoteError::Internal(e.to_string()))?;
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT OR REPLACE INTO load_profiles
                    (id, name, description, interval_minutes, values_json)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    profile.id.to_string(),
                    profile.name,
                    profile.description,
                    i64::from(profile.interval_minutes),
                    values_json,
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_profile_row(row: &Row<'_>) -> rusqlite::Result<LoadProfile> {
    let id: String = row.get(0)?;
    let interval_minutes: i64 = row.get(3)?;
    let values_json: String = row.get(4)?;

    Ok(LoadProfile {
        id: uuid_from_sql(0, &id)?,
        name: row.get(1)?,
        description: row.get(2)?,
        interval_minutes: u32::try_from(interval_minutes).unwrap_or(0),
        values: json_from_sql(4, &values_json)?,
    })
}
