//! SQLite-backed implementation of the `ProjectRepository` port.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use sunquote_core::project::ports::ProjectRepository;
use sunquote_domain::types::{DesignType, Project, SystemDesign};
use sunquote_domain::Result as DomainResult;
use tokio::task;
use uuid::Uuid;

use super::manager::DbManager;
use super::{datetime_from_sql, datetime_to_sql, json_from_sql, map_join_error, map_sql_error};

/// SQLite-backed project repository.
pub struct SqliteProjectRepository {
    db: Arc<DbManager>,
}

impl SqliteProjectRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProjectRepository for SqliteProjectRepository {
    async fn get_project(&self, id: Uuid) -> DomainResult<Option<Project>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<Project>> {
            let conn = db.get_connection()?;
            conn.query_row(PROJECT_SELECT_BY_ID, params![id.to_string()], map_project_row)
                .optional()
                .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_projects(&self) -> DomainResult<Vec<Project>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<Project>> {
            let conn = db.get_connection()?;
            let mut stmt = conn.prepare(PROJECT_SELECT_ALL).map_err(map_sql_error)?;
            let rows = stmt
                .query_map([], map_project_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            Ok(rows)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn upsert_project(&self, project: &Project) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let project = project.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            insert_project(&conn, &project)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn set_bom_subtotal(&self, project_id: Uuid, subtotal: f64) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "UPDATE projects SET bom_subtotal = ?1, updated_at = ?2 WHERE id = ?3",
                params![subtotal, datetime_to_sql(chrono::Utc::now()), project_id.to_string()],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

const PROJECT_COLUMNS: &str = "id, client_name, site_address, contact_email, contact_phone,
        tariff_id, design_type, system_json, bom_subtotal, created_at, updated_at";

const PROJECT_SELECT_BY_ID: &str = "SELECT id, client_name, site_address, contact_email,
        contact_phone, tariff_id, design_type, system_json, bom_subtotal, created_at, updated_at
    FROM projects WHERE id = ?1";

const PROJECT_SELECT_ALL: &str = "SELECT id, client_name, site_address, contact_email,
        contact_phone, tariff_id, design_type, system_json, bom_subtotal, created_at, updated_at
    FROM projects ORDER BY updated_at DESC";

fn insert_project(conn: &Connection, project: &Project) -> DomainResult<()> {
    let system_json = serde_json::to_string(&project.system)
        .map_err(|e| sunquote_domain::SunquoteError::Internal(e.to_string()))?;

    conn.execute(
        &format!(
            "INSERT OR REPLACE INTO projects ({PROJECT_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
        ),
        params![
            project.id.to_string(),
            project.client_name,
            project.site_address,
            project.contact_email,
            project.contact_phone,
            project.tariff_id,
            design_type_to_str(project.design_type),
            system_json,
            project.bom_subtotal,
            datetime_to_sql(project.created_at),
            datetime_to_sql(project.updated_at),
        ],
    )
    .map_err(map_sql_error)?;
    Ok(())
}

fn map_project_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    let id: String = row.get(0)?;
    let design_type: String = row.get(6)?;
    let system_json: String = row.get(7)?;
    let created_at: String = row.get(9)?;
    let updated_at: String = row.get(10)?;

    let system: SystemDesign = json_from_sql(7, &system_json)?;

    Ok(Project {
        id: super::uuid_from_sql(0, &id)?,
        client_name: row.get(1)?,
        site_address: row.get(2)?,
        contact_email: row.get(3)?,
        contact_phone: row.get(4)?,
        tariff_id: row.get(5)?,
        design_type: design_type_from_str(6, &design_type)?,
        system,
        bom_subtotal: row.get(8)?,
        created_at: datetime_from_sql(9, &created_at)?,
        updated_at: datetime_from_sql(10, &updated_at)?,
    })
}

fn design_type_to_str(value: DesignType) -> &'static str {
    match value {
        DesignType::Quick => "quick",
        DesignType::Full => "full",
    }
}

fn design_type_from_str(column: usize, value: &str) -> rusqlite::Result<DesignType> {
    match value {
        "quick" => Ok(DesignType::Quick),
        "full" => Ok(DesignType::Full),
        other => Err(rusqlite::Error::FromSqlConversionFailure(
            column,
            rusqlite::types::Type::Text,
            format!("unknown design type {other:?}").into(),
        )),
    }
}
