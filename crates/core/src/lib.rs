//! # Finalizer Core
//!
//! Lifecycle logic for the deferred finalization cleaner worker.
//!
//! This crate contains:
//! - The lazily created, process-wide cleaner worker lifecycle
//! - The port through which workers are created and shut down
//! - The execution context gate callers must pass
//!
//! ## Architecture Principles
//! - Only depends on `finalizer-common` and `finalizer-domain`
//! - No thread spawning or queueing; workers live behind a trait
//! - Pure, testable lifecycle logic

pub mod cleaner;

// Re-export specific items to avoid ambiguity
pub use cleaner::context::{current_thread_state, ThreadStateGuard};
pub use cleaner::errors::{CleanerError, CleanerResult};
pub use cleaner::global::{get_cleaner_worker, install_global, shutdown_cleaners};
pub use cleaner::manager::CleanerWorkerManager;
pub use cleaner::ports::CleanerWorkerPort;
