//! # Sunquote Common
//!
//! Foundation crate for the Sunquote workspace.
//!
//! This crate contains:
//! - Storage primitives (SQLite connection pool, storage errors)
//!
//! ## Architecture
//! - No dependencies on other Sunquote crates
//! - Domain-agnostic: nothing in here knows about quotes or products

pub mod storage;

pub use storage::{SqlitePool, SqlitePoolConfig, StorageError, StorageResult};
