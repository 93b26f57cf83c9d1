//! Configuration loader
//!
//! Builds the application [`Config`] from an optional config file with
//! environment variable overrides on top.
//!
//! ## Loading Strategy
//! 1. Start from defaults
//! 2. Merge in a config file if one is found (JSON or TOML by extension)
//! 3. Apply `SUNQUOTE_*` environment overrides
//!
//! ## Environment Variables
//! - `SUNQUOTE_DB_PATH`: Database file path
//! - `SUNQUOTE_DB_POOL_SIZE`: Connection pool size
//! - `SUNQUOTE_BIND_ADDR`: API server bind address
//! - `SUNQUOTE_ENGINE_URL`: Base URL of the simulation engine
//! - `SUNQUOTE_ENGINE_TIMEOUT`: Engine request timeout in seconds
//!
//! ## File Locations
//! The loader probes `./config.{json,toml}` and `./sunquote.{json,toml}`
//! in the working directory, then the same names next to the executable.

use std::path::{Path, PathBuf};

use sunquote_domain::{Config, Result, SunquoteError};

/// Load configuration: file (if any) plus environment overrides.
///
/// # Errors
/// Returns `SunquoteError::Config` if a config file exists but cannot be
/// parsed, or an override has an invalid value.
pub fn load_config() -> Result<Config> {
    let mut config = match probe_config_paths() {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading configuration from file");
            load_from_file(Some(path))?
        }
        None => {
            tracing::debug!("no config file found, starting from defaults");
            Config::default()
        }
    };
    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Load configuration from a file.
///
/// If `path` is `None`, probes the standard locations. Format is detected
/// by file extension.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(SunquoteError::Config(format!(
                    "config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            SunquoteError::Config("no config file found in any of the standard locations".into())
        })?,
    };

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| SunquoteError::Config(format!("failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| SunquoteError::Config(format!("invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| SunquoteError::Config(format!("invalid JSON format: {e}"))),
        _ => Err(SunquoteError::Config(format!("unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a config file.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend([
            cwd.join("config.json"),
            cwd.join("config.toml"),
            cwd.join("sunquote.json"),
            cwd.join("sunquote.toml"),
        ]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend([
                exe_dir.join("config.json"),
                exe_dir.join("config.toml"),
                exe_dir.join("sunquote.json"),
                exe_dir.join("sunquote.toml"),
            ]);
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Ok(path) = std::env::var("SUNQUOTE_DB_PATH") {
        config.database.path = path;
    }
    if let Ok(size) = std::env::var("SUNQUOTE_DB_POOL_SIZE") {
        config.database.pool_size = size
            .parse()
            .map_err(|e| SunquoteError::Config(format!("invalid pool size: {e}")))?;
    }
    if let Ok(addr) = std::env::var("SUNQUOTE_BIND_ADDR") {
        config.http.bind_addr = addr;
    }
    if let Ok(url) = std::env::var("SUNQUOTE_ENGINE_URL") {
        config.engine.base_url = if url.is_empty() { None } else { Some(url) };
    }
    if let Ok(timeout) = std::env::var("SUNQUOTE_ENGINE_TIMEOUT") {
        config.engine.timeout_seconds = timeout
            .parse()
            .map_err(|e| SunquoteError::Config(format!("invalid engine timeout: {e}")))?;
    }
    Ok(())
}
