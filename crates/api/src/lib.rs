//! # Sunquote API
//!
//! REST surface for the quoting backend: an axum router over the services
//! in `sunquote-core`, wired together by [`AppContext`].
//!
//! ## Architecture
//! - [`AppContext`] is the dependency-injection container: pool, repositories,
//!   services, engine client
//! - Route handlers live in [`routes`], one module per resource
//! - [`error::ApiError`] maps the domain error taxonomy onto HTTP statuses

pub mod context;
pub mod error;
pub mod routes;

pub use context::AppContext;
pub use error::{ApiError, ApiResult};
pub use routes::build_router;
