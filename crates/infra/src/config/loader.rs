//! Configuration loader
//!
//! Loads cleaner configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If none are set, falls back to loading from file
//! 3. Probes the working directory for config files
//! 4. Falls back to defaults when no file exists
//!
//! ## Environment Variables
//! - `FINALIZER_CLEANER_THREAD_NAME`: worker thread name
//! - `FINALIZER_CLEANER_STACK_SIZE`: worker stack size in bytes
//! - `FINALIZER_CLEANER_DRAIN_ON_SHUTDOWN`: run queued cleanups at shutdown
//!   (true/false)
//! - `FINALIZER_LOG_FILTER`: default `tracing` filter
//!
//! ## File Locations
//! The loader probes, in order: `./finalizer.toml`, `./finalizer.json`,
//! `./config.toml`, `./config.json`.

use std::path::{Path, PathBuf};

use finalizer_domain::constants::{
    CONFIG_FILE_CANDIDATES, ENV_DRAIN_ON_SHUTDOWN, ENV_LOG_FILTER, ENV_STACK_SIZE,
    ENV_THREAD_NAME,
};
use finalizer_domain::{CleanerConfig, DomainError, Result};

/// Load configuration with automatic fallback strategy
///
/// Environment first, then the first config file found, then defaults.
///
/// # Errors
/// Returns `DomainError::Config` if a source exists but is invalid.
pub fn load() -> Result<CleanerConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "No usable environment configuration, trying file");
            match probe_config_paths() {
                Some(path) => load_from_file(Some(path)),
                None => {
                    tracing::info!("No config file found, using defaults");
                    Ok(CleanerConfig::default())
                }
            }
        }
    }
}

/// Load configuration from environment variables
///
/// Unset variables keep their defaults, but at least one must be set.
///
/// # Errors
/// Returns `DomainError::Config` if no variable is set, a value does not
/// parse, or the result fails validation.
pub fn load_from_env() -> Result<CleanerConfig> {
    config_from_vars(|key| std::env::var(key).ok())
}

/// Build a configuration from a variable lookup
///
/// # Errors
/// See [`load_from_env`].
pub fn config_from_vars<F>(var: F) -> Result<CleanerConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let thread_name = var(ENV_THREAD_NAME);
    let stack_size = var(ENV_STACK_SIZE);
    let drain = var(ENV_DRAIN_ON_SHUTDOWN);
    let log_filter = var(ENV_LOG_FILTER);

    if thread_name.is_none() && stack_size.is_none() && drain.is_none() && log_filter.is_none() {
        return Err(DomainError::Config("No FINALIZER_* environment variables set".to_string()));
    }

    let mut config = CleanerConfig::default();
    if let Some(name) = thread_name {
        config.thread_name = name;
    }
    if let Some(size) = stack_size {
        config.stack_size = Some(size.trim().parse::<usize>().map_err(|e| {
            DomainError::Config(format!("Invalid {}: {}", ENV_STACK_SIZE, e))
        })?);
    }
    if let Some(value) = drain {
        config.drain_on_shutdown = parse_bool(&value).ok_or_else(|| {
            DomainError::Config(format!("Invalid {}: {}", ENV_DRAIN_ON_SHUTDOWN, value))
        })?;
    }
    if let Some(filter) = log_filter {
        config.log_filter = filter;
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations.
///
/// # Errors
/// Returns `DomainError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid or validation fails
pub fn load_from_file(path: Option<PathBuf>) -> Result<CleanerConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(DomainError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            DomainError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| DomainError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse and validate configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `DomainError::Config` if the format is unsupported, parsing
/// fails, or validation fails.
pub fn parse_config(contents: &str, path: &Path) -> Result<CleanerConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    let config: CleanerConfig = match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| DomainError::Config(format!("Invalid TOML format: {}", e)))?,
        "json" => serde_json::from_str(contents)
            .map_err(|e| DomainError::Config(format!("Invalid JSON format: {}", e)))?,
        _ => {
            return Err(DomainError::Config(format!("Unsupported config format: {}", extension)))
        }
    };

    config.validate()?;
    Ok(config)
}

/// Probe the working directory for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    std::env::current_dir().ok().and_then(|cwd| probe_config_paths_in(&cwd))
}

/// Probe `dir` for the standard config file names, in order
pub fn probe_config_paths_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_CANDIDATES.iter().map(|name| dir.join(name)).find(|path| path.exists())
}

/// Parse a boolean setting
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
