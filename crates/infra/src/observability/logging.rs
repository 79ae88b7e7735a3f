//! `tracing` subscriber setup
//!
//! `RUST_LOG` wins when set; otherwise the configured default filter is used.
//! Installation is idempotent: only the first call in a process installs a
//! subscriber, later calls report `false`.

use finalizer_domain::constants::DEFAULT_LOG_FILTER;
use tracing_subscriber::EnvFilter;

/// Build the filter from `RUST_LOG`, falling back to `default_filter`
///
/// An unparsable default falls back to `info`.
pub fn build_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|err| {
            tracing::warn!(filter = default_filter, error = %err, "invalid log filter, using default");
            EnvFilter::new(DEFAULT_LOG_FILTER)
        })
}

/// Install a human-readable fmt subscriber
///
/// Returns `true` if this call installed the global subscriber.
pub fn init_logging(default_filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(default_filter))
        .with_target(true)
        .with_thread_names(true)
        .try_init()
        .is_ok()
}

/// Install a JSON fmt subscriber for machine ingestion
///
/// Returns `true` if this call installed the global subscriber.
pub fn init_json_logging(default_filter: &str) -> bool {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(build_filter(default_filter))
        .with_current_span(false)
        .with_thread_names(true)
        .try_init()
        .is_ok()
}
