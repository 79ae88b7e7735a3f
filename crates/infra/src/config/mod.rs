//! Configuration loading
//!
//! Loads [`finalizer_domain::CleanerConfig`] from environment variables and
//! files.

pub mod loader;

// Re-export commonly used items
pub use loader::{
    config_from_vars, load, load_from_env, load_from_file, parse_config, probe_config_paths,
    probe_config_paths_in,
};
