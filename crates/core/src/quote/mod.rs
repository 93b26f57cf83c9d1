//! Quote lifecycle: versioned immutable snapshots of a project's BOM

pub mod ports;
pub mod service;

pub use ports::QuoteRepository;
pub use service::QuoteService;
