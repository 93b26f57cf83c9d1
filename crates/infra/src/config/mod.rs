//! Configuration loading

mod loader;

pub use loader::{load_config, load_from_file, probe_config_paths};
