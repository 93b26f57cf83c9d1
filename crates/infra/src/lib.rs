//! # Sunquote Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite repository implementations
//! - Configuration loading (environment and files)
//! - The HTTP client for the external simulation engine
//!
//! ## Architecture
//! - Implements traits defined in `sunquote-core`
//! - Depends on `sunquote-common`, `sunquote-domain`, and `sunquote-core`
//! - Contains all "impure" code (I/O, network)

pub mod config;
pub mod database;
pub mod engine;
pub mod errors;

pub use config::load_config;
pub use database::DbManager;
pub use engine::EngineClient;
pub use errors::InfraError;
