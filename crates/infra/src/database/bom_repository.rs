//! SQLite-backed implementations of the BOM persistence ports.
//!
//! Holds both the per-project line store and the reusable template store;
//! they share the positional-line shape.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use sunquote_core::bom::ports::{BomRepository, TemplateRepository};
use sunquote_domain::types::{BomLine, BomTemplate, TemplateLine};
use sunquote_domain::Result as DomainResult;
use tokio::task;
use uuid::Uuid;

use super::manager::DbManager;
use super::{datetime_from_sql, datetime_to_sql, map_join_error, map_sql_error, uuid_from_sql};

/// SQLite-backed BOM line repository.
pub struct SqliteBomRepository {
    db: Arc<DbManager>,
}

impl SqliteBomRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BomRepository for SqliteBomRepository {
    async fn get_lines(&self, project_id: Uuid) -> DomainResult<Vec<BomLine>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<BomLine>> {
            let conn = db.get_connection()?;
            let mut stmt = conn.prepare(BOM_SELECT_FOR_PROJECT).map_err(map_sql_error)?;
            let lines = stmt
                .query_map(params![project_id.to_string()], map_bom_line_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            Ok(lines)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn replace_lines(&self, project_id: Uuid, lines: &[BomLine]) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let lines = lines.to_vec();

        task::spawn_blocking(move || -> DomainResult<()> {
            let mut conn = db.get_connection()?;
            let tx = conn.transaction().map_err(map_sql_error)?;
            tx.execute(
                "DELETE FROM bom_lines WHERE project_id = ?1",
                params![project_id.to_string()],
            )
            .map_err(map_sql_error)?;
            for (position, line) in lines.iter().enumerate() {
                tx.execute(
                    BOM_INSERT_LINE,
                    params![
                        project_id.to_string(),
                        position as i64,
                        line.product_id.to_string(),
                        i64::from(line.quantity),
                        line.override_margin,
                        line.unit_cost_at_time,
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
}

const BOM_SELECT_FOR_PROJECT: &str = "SELECT product_id, quantity, override_margin,
        unit_cost_at_time
    FROM bom_lines WHERE project_id = ?1 ORDER BY position";

const BOM_INSERT_LINE: &str = "INSERT INTO bom_lines (
        project_id, position, product_id, quantity, override_margin, unit_cost_at_time
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

fn map_bom_line_row(row: &Row<'_>) -> rusqlite::Result<BomLine> {
    let product_id: String = row.get(0)?;
    let quantity: i64 = row.get(1)?;
    Ok(BomLine {
        product_id: uuid_from_sql(0, &product_id)?,
        quantity: u32::try_from(quantity).unwrap_or(0),
        override_margin: row.get(2)?,
        unit_cost_at_time: row.get(3)?,
    })
}

/// SQLite-backed template repository.
pub struct SqliteTemplateRepository {
    db: Arc<DbManager>,
}

impl SqliteTemplateRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TemplateRepository for SqliteTemplateRepository {
    async fn save_template(&self, template: &BomTemplate) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let template = template.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let mut conn = db.get_connection()?;
            let tx = conn.transaction().map_err(map_sql_error)?;
            tx.execute(
                "INSERT OR REPLACE INTO bom_templates (id, name, created_at) VALUES (?1, ?2, ?3)",
                params![
                    template.id.to_string(),
                    template.name,
                    datetime_to_sql(template.created_at)
                ],
            )
            .map_err(map_sql_error)?;
            tx.execute(
                "DELETE FROM bom_template_lines WHERE template_id = ?1",
                params![template.id.to_string()],
            )
            .map_err(map_sql_error)?;
            for (position, line) in template.lines.iter().enumerate() {
                tx.execute(
                    "INSERT INTO bom_template_lines (template_id, position, product_id, quantity)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![
                        template.id.to_string(),
                        position as i64,
                        line.product_id.to_string(),
                        i64::from(line.quantity),
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

    async fn get_template(&self, id: Uuid) -> DomainResult<Option<BomTemplate>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<BomTemplate>> {
            let conn = db.get_connection()?;
            let header = conn
                .query_row(
                    "SELECT id, name, created_at FROM bom_templates WHERE id = ?1",
                    params![id.to_string()],
                    map_template_header,
                )
                .optional()
                .map_err(map_sql_error)?;

            match header {
                Some(mut template) => {
                    template.lines = template_lines(&conn, id)?;
                    Ok(Some(template))
                }
                None => Ok(None),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_templates(&self) -> DomainResult<Vec<BomTemplate>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<BomTemplate>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare("SELECT id, name, created_at FROM bom_templates ORDER BY created_at DESC")
                .map_err(map_sql_error)?;
            let mut templates = stmt
                .query_map([], map_template_header)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;

            for template in &mut templates {
                template.lines = template_lines(&conn, template.id)?;
            }
            Ok(templates)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_template_header(row: &Row<'_>) -> rusqlite::Result<BomTemplate> {
    let id: String = row.get(0)?;
    let created_at: String = row.get(2)?;
    Ok(BomTemplate {
        id: uuid_from_sql(0, &id)?,
        name: row.get(1)?,
        lines: Vec::new(),
        created_at: datetime_from_sql(2, &created_at)?,
    })
}

fn template_lines(conn: &Connection, template_id: Uuid) -> DomainResult<Vec<TemplateLine>> {
    let mut stmt = conn
        .prepare(
            "SELECT product_id, quantity FROM bom_template_lines
             WHERE template_id = ?1 ORDER BY position",
        )
        .map_err(map_sql_error)?;
    let lines = stmt
        .query_map(params![template_id.to_string()], |row| {
            let product_id: String = row.get(0)?;
            let quantity: i64 = row.get(1)?;
            Ok(TemplateLine {
                product_id: uuid_from_sql(0, &product_id)?,
                quantity: u32::try_from(quantity).unwrap_or(0),
            })
        })
        .map_err(map_sql_error)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(map_sql_error)?;
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tempfile::TempDir;

    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn replace_keeps_line_order_and_overrides() {
        let (boms, _templates, manager, _dir) = setup().await;
        let project_id = insert_project(&manager);

        let lines = vec![
            BomLine {
                product_id: Uuid::new_v4(),
                quantity: 12,
                override_margin: Some(0.2),
                unit_cost_at_time: Some(180.0),
            },
            BomLine::new(Uuid::new_v4(), 1),
        ];
        boms.replace_lines(project_id, &lines).await.expect("saved");

        let loaded = boms.get_lines(project_id).await.expect("fetched");
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].quantity, 12);
        assert_eq!(loaded[0].override_margin, Some(0.2));
        assert_eq!(loaded[0].unit_cost_at_time, Some(180.0));
        assert_eq!(loaded[1].product_id, lines[1].product_id);

        // A second replace fully supersedes the first.
        boms.replace_lines(project_id, &lines[1..]).await.expect("saved");
        let loaded = boms.get_lines(project_id).await.expect("fetched");
        assert_eq!(loaded.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn templates_roundtrip_with_lines() {
        let (_boms, templates, _manager, _dir) = setup().await;

        let template = BomTemplate {
            id: Uuid::new_v4(),
            name: "Standard extras".into(),
            lines: vec![
                TemplateLine { product_id: Uuid::new_v4(), quantity: 4 },
                TemplateLine { product_id: Uuid::new_v4(), quantity: 1 },
            ],
            created_at: Utc::now(),
        };
        templates.save_template(&template).await.expect("saved");

        let loaded =
            templates.get_template(template.id).await.expect("fetched").expect("present");
        assert_eq!(loaded.name, "Standard extras");
        assert_eq!(loaded.lines.len(), 2);
        assert_eq!(loaded.lines[0].quantity, 4);

        let listed = templates.list_templates().await.expect("listed");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].lines.len(), 2);
    }

    async fn setup() -> (SqliteBomRepository, SqliteTemplateRepository, Arc<DbManager>, TempDir) {
        let dir = TempDir::new().expect("temp dir created");
        let manager =
            Arc::new(DbManager::new(dir.path().join("bom.db"), 4).expect("manager created"));
        manager.run_migrations().expect("migrations run");
        (
            SqliteBomRepository::new(manager.clone()),
            SqliteTemplateRepository::new(manager.clone()),
            manager,
            dir,
        )
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
}
