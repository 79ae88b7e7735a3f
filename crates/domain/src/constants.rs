//! Domain constants
//!
//! Defaults shared by the configuration, the worker backend and the loader.

// Worker thread defaults
pub const DEFAULT_THREAD_NAME: &str = "cleaner-worker";
pub const MIN_STACK_SIZE: usize = 16 * 1024;
pub const DEFAULT_DRAIN_ON_SHUTDOWN: bool = true;

// Logging
pub const DEFAULT_LOG_FILTER: &str = "info";

// Environment variables read by the config loader
pub const ENV_THREAD_NAME: &str = "FINALIZER_CLEANER_THREAD_NAME";
pub const ENV_STACK_SIZE: &str = "FINALIZER_CLEANER_STACK_SIZE";
pub const ENV_DRAIN_ON_SHUTDOWN: &str = "FINALIZER_CLEANER_DRAIN_ON_SHUTDOWN";
pub const ENV_LOG_FILTER: &str = "FINALIZER_LOG_FILTER";

// Config files probed in the working directory, in order
pub const CONFIG_FILE_CANDIDATES: [&str; 4] =
    ["finalizer.toml", "finalizer.json", "config.toml", "config.json"];
