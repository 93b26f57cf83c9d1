//! Product catalog: repository port and fuzzy search

pub mod ports;
pub mod search;

pub use ports::ProductRepository;
pub use search::search_products;
