//! # Sunquote Core
//!
//! Business logic for the quoting backend: pricing, BOM management, the
//! quote lifecycle, catalog search, print pagination, load profiles, and
//! consumption parsing.
//!
//! ## Architecture
//! - Depends on `sunquote-domain` only
//! - Persistence and HTTP live behind port traits implemented in infra
//! - Pure computation (pricing, pagination, search) is free of ports

pub mod bom;
pub mod catalog;
pub mod consumption;
pub mod pagination;
pub mod pricing;
pub mod profile;
pub mod project;
pub mod quote;

pub use bom::service::{BomService, SavedBom};
pub use bom::{line_permissions, regenerate_core_lines, LinePermissions};
pub use catalog::search::search_products;
pub use pricing::{price_line, PricedLine};
pub use profile::service::ProfileService;
pub use quote::service::QuoteService;
