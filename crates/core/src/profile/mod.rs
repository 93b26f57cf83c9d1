//! Stock load profiles and the quick-design flow

pub mod ports;
pub mod service;

pub use ports::LoadProfileRepository;
pub use service::ProfileService;
