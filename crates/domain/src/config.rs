//! Cleaner worker configuration

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DRAIN_ON_SHUTDOWN, DEFAULT_LOG_FILTER, DEFAULT_THREAD_NAME, MIN_STACK_SIZE,
};
use crate::errors::{DomainError, Result};

/// Settings for the background cleaner worker
///
/// Every field has a default, so partial TOML or JSON documents are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// Name given to the worker OS thread
    pub thread_name: String,

    /// Worker thread stack size in bytes (platform default when unset)
    pub stack_size: Option<usize>,

    /// Run queued cleanups when the runtime shuts down
    pub drain_on_shutdown: bool,

    /// Default `tracing` filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            thread_name: DEFAULT_THREAD_NAME.to_string(),
            stack_size: None,
            drain_on_shutdown: DEFAULT_DRAIN_ON_SHUTDOWN,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl CleanerConfig {
    /// Check the settings can be used to spawn a worker
    ///
    /// # Errors
    /// Returns `DomainError::Config` for an empty thread name, a name with an
    /// interior NUL, or a stack size below [`MIN_STACK_SIZE`].
    pub fn validate(&self) -> Result<()> {
        if self.thread_name.trim().is_empty() {
            return Err(DomainError::Config("thread_name must not be empty".to_string()));
        }
        if self.thread_name.contains('\0') {
            return Err(DomainError::Config("thread_name must not contain NUL".to_string()));
        }
        if let Some(stack_size) = self.stack_size {
            if stack_size < MIN_STACK_SIZE {
                return Err(DomainError::Config(format!(
                    "stack_size {} is below the minimum of {} bytes",
                    stack_size, MIN_STACK_SIZE
                )));
            }
        }
        Ok(())
    }
}
