//! Cleaner worker lifecycle
//!
//! This module provides the single background cleaner worker shared by all
//! mutator threads: created on first request, torn down once at shutdown.

pub mod context;
pub mod errors;
pub mod global;
pub mod manager;
pub mod ports;

pub use context::{assert_thread_state, current_thread_state, ThreadStateGuard};
pub use errors::{CleanerError, CleanerResult};
pub use manager::CleanerWorkerManager;
pub use ports::CleanerWorkerPort;
