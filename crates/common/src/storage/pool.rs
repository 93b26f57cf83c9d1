//! SQLite connection pool
//!
//! Provides r2d2-based connection pooling for the workspace database.
//! Connections are initialised with WAL journalling, foreign keys, and a
//! busy timeout so concurrent repository access degrades to waiting
//! instead of failing.

use std::path::Path;
use std::time::Duration;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use tracing::{debug, info, warn};

use super::error::{StorageError, StorageResult};

/// Pool configuration.
#[derive(Debug, Clone)]
pub struct SqlitePoolConfig {
    /// Maximum number of pooled connections.
    pub max_size: u32,
    /// How long `get` waits for a free connection before failing.
    pub connection_timeout: Duration,
    /// SQLite busy timeout applied per connection.
    pub busy_timeout: Duration,
}

impl Default for SqlitePoolConfig {
    fn default() -> Self {
        Self {
            max_size: 10,
            connection_timeout: Duration::from_secs(30),
            busy_timeout: Duration::from_secs(5),
        }
    }
}

/// SQLite connection pool.
///
/// Manages a pool of SQLite connections using r2d2. Schema migrations are
/// the application layer's responsibility; the pool only guarantees that
/// every connection it hands out has the standard pragmas applied.
#[derive(Debug)]
pub struct SqlitePool {
    pool: Pool<SqliteConnectionManager>,
    config: SqlitePoolConfig,
}

impl SqlitePool {
    /// Create a new pool for the database at `path`.
    ///
    /// # Errors
    /// Returns an error if the database file can't be opened or the pool
    /// fails to initialise its first connection.
    pub fn new(path: &Path, config: SqlitePoolConfig) -> StorageResult<Self> {
        if config.max_size == 0 {
            return Err(StorageError::InvalidConfig(
                "pool max_size must be at least 1".into(),
            ));
        }

        let busy_timeout = config.busy_timeout;
        let manager = SqliteConnectionManager::file(path)
            .with_init(move |conn| apply_connection_pragmas(conn, busy_timeout));

        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .map_err(|e| {
                warn!(error = %e, "failed to create connection pool");
                StorageError::Connection(format!("failed to create pool: {e}"))
            })?;

        // Prove the database is usable before handing the pool out.
        {
            let conn = pool
                .get()
                .map_err(|e| StorageError::Connection(format!("test connection failed: {e}")))?;
            conn.query_row("SELECT 1", [], |row| row.get::<_, i32>(0))?;
        }

        info!(db_path = %path.display(), max_size = config.max_size, "sqlite pool initialised");

        Ok(Self { pool, config })
    }

    /// Create an in-memory pool with a single shared connection.
    ///
    /// Only useful for tests; an in-memory database disappears when its
    /// last connection closes, so the pool is capped at one connection.
    pub fn in_memory() -> StorageResult<Self> {
        let manager = SqliteConnectionManager::memory()
            .with_init(|conn| apply_connection_pragmas(conn, Duration::from_secs(5)));
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e| StorageError::Connection(format!("failed to create pool: {e}")))?;
        Ok(Self { pool, config: SqlitePoolConfig { max_size: 1, ..SqlitePoolConfig::default() } })
    }

    /// Acquire a connection from the pool.
    ///
    /// # Errors
    /// Returns [`StorageError::Timeout`] when no connection frees up within
    /// the configured window.
    pub fn get(&self) -> StorageResult<PooledConnection<SqliteConnectionManager>> {
        self.pool.get().map_err(|e| {
            debug!(error = %e, "connection checkout failed");
            StorageError::Timeout(self.config.connection_timeout.as_secs())
        })
    }

    /// Current pool configuration.
    pub fn config(&self) -> &SqlitePoolConfig {
        &self.config
    }

    /// Number of idle connections currently held by the pool.
    pub fn idle_connections(&self) -> u32 {
        self.pool.state().idle_connections
    }
}

fn apply_connection_pragmas(
    conn: &mut Connection,
    busy_timeout: Duration,
) -> Result<(), rusqlite::Error> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.busy_timeout(busy_timeout)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn pool_opens_and_serves_connections() {
        let dir = TempDir::new().expect("temp dir created");
        let path = dir.path().join("pool.db");

        let pool = SqlitePool::new(&path, SqlitePoolConfig::default()).expect("pool created");
        let conn = pool.get().expect("connection acquired");

        let answer: i32 =
            conn.query_row("SELECT 40 + 2", [], |row| row.get(0)).expect("query ran");
        assert_eq!(answer, 42);
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let dir = TempDir::new().expect("temp dir created");
        let path = dir.path().join("fk.db");

        let pool = SqlitePool::new(&path, SqlitePoolConfig::default()).expect("pool created");
        let conn = pool.get().expect("connection acquired");
        conn.execute_batch(
            "CREATE TABLE parent (id INTEGER PRIMARY KEY);
             CREATE TABLE child (
                 id INTEGER PRIMARY KEY,
                 parent_id INTEGER NOT NULL REFERENCES parent(id)
             );",
        )
        .expect("schema created");

        let result = conn.execute("INSERT INTO child (id, parent_id) VALUES (1, 99)", []);
        assert!(result.is_err(), "orphan insert must be rejected");
    }

    #[test]
    fn zero_sized_pool_is_rejected() {
        let dir = TempDir::new().expect("temp dir created");
        let path = dir.path().join("zero.db");

        let config = SqlitePoolConfig { max_size: 0, ..SqlitePoolConfig::default() };
        let result = SqlitePool::new(&path, config);
        assert!(matches!(result, Err(StorageError::InvalidConfig(_))));
    }
}
