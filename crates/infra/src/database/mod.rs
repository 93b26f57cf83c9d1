//! SQLite persistence layer
//!
//! Repository implementations for the port traits in `sunquote-core`. All
//! repositories share the pooled connection owned by [`DbManager`] and run
//! their queries on the blocking thread pool.

pub mod bom_repository;
pub mod consumption_repository;
pub mod load_profile_repository;
pub mod manager;
pub mod product_repository;
pub mod project_repository;
pub mod quote_repository;

pub use bom_repository::{SqliteBomRepository, SqliteTemplateRepository};
pub use consumption_repository::SqliteConsumptionRepository;
pub use load_profile_repository::SqliteLoadProfileRepository;
pub use manager::DbManager;
pub use product_repository::SqliteProductRepository;
pub use project_repository::SqliteProjectRepository;
pub use quote_repository::SqliteQuoteRepository;

use chrono::{DateTime, Utc};
use sunquote_common::StorageError;
use sunquote_domain::SunquoteError;
use tokio::task;
use uuid::Uuid;

/// Map a pool/storage failure into the domain error.
pub(crate) fn map_storage_error(err: StorageError) -> SunquoteError {
    match err {
        StorageError::Timeout(seconds) => {
            SunquoteError::Database(format!("database timeout after {seconds}s"))
        }
        StorageError::PoolExhausted => {
            SunquoteError::Database("connection pool exhausted".into())
        }
        other => SunquoteError::Database(other.to_string()),
    }
}

/// Map a blocking-task join failure into the domain error.
pub(crate) fn map_join_error(err: task::JoinError) -> SunquoteError {
    if err.is_cancelled() {
        SunquoteError::Internal("blocking repository task cancelled".into())
    } else {
        SunquoteError::Internal(format!("blocking repository task failed: {err}"))
    }
}

/// Map a raw sqlite failure into the domain error.
pub(crate) fn map_sql_error(err: rusqlite::Error) -> SunquoteError {
    crate::errors::InfraError::from(err).into()
}

/// Format a timestamp for storage. Timestamps are stored as RFC 3339 text
/// so they stay readable in the file and sort lexicographically.
pub(crate) fn datetime_to_sql(value: DateTime<Utc>) -> String {
    value.to_rfc3339()
}

/// Parse a stored RFC 3339 timestamp back out of a column.
pub(crate) fn datetime_from_sql(column: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|err| conversion_failure(column, err))
}

/// Parse a stored UUID column.
pub(crate) fn uuid_from_sql(column: usize, value: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(value).map_err(|err| conversion_failure(column, err))
}

pub(crate) fn json_from_sql<T: serde::de::DeserializeOwned>(
    column: usize,
    value: &str,
) -> rusqlite::Result<T> {
    serde_json::from_str(value).map_err(|err| conversion_failure(column, err))
}

fn conversion_failure(
    column: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(err))
}
