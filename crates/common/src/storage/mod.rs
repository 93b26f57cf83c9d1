//! Storage primitives
//!
//! Generic SQLite storage infrastructure: an r2d2-backed connection pool
//! with connection pragmas applied on checkout, plus the storage error
//! taxonomy shared by every repository in the workspace.

pub mod error;
pub mod pool;

pub use error::{StorageError, StorageResult};
pub use pool::{SqlitePool, SqlitePoolConfig};
