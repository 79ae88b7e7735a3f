//! Thread-backed cleaner worker
//!
//! - **[`queue`]**: FIFO of pending cleanup actions
//! - **[`thread_worker`]**: one OS thread draining a queue
//! - **[`backend`]**: `CleanerWorkerPort` implementation and handle registry
//! - **[`metrics`]**: per-worker counters

pub mod backend;
pub mod metrics;
pub mod queue;
pub mod thread_worker;

pub use backend::ThreadCleanerBackend;
pub use metrics::WorkerMetrics;
pub use queue::{CleanupAction, PendingCleanupQueue};
pub use thread_worker::CleanerWorker;
