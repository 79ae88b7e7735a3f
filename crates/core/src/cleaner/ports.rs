//! Worker factory and shutdown port
//!
//! The lifecycle manager never spawns anything itself. It asks a
//! [`CleanerWorkerPort`] to create the worker and, at teardown, to stop it.
//!
//! # Example
//!
//! ```no_run
//! use finalizer_core::{CleanerResult, CleanerWorkerPort};
//! use finalizer_domain::WorkerId;
//!
//! struct InlinePort;
//!
//! impl CleanerWorkerPort for InlinePort {
//!     fn create_worker(&self) -> CleanerResult<WorkerId> {
//!         Ok(WorkerId::new(1)?)
//!     }
//!
//!     fn shutdown_worker(&self, _id: WorkerId, _drain: bool) -> CleanerResult<()> {
//!         Ok(())
//!     }
//! }
//! ```

use std::sync::Arc;

use finalizer_domain::WorkerId;

use super::errors::CleanerResult;

/// Port for creating and stopping the background cleaner worker.
pub trait CleanerWorkerPort: Send + Sync {
    /// Create a worker and return its identity.
    ///
    /// Called at most once per lifecycle epoch, from the thread that won the
    /// creation race. May block.
    fn create_worker(&self) -> CleanerResult<WorkerId>;

    /// Stop the worker identified by `id`.
    ///
    /// With `execute_scheduled_cleaners` set, cleanups queued before the call
    /// run before the worker exits; otherwise they are dropped. May block
    /// until the worker acknowledges.
    fn shutdown_worker(&self, id: WorkerId, execute_scheduled_cleaners: bool)
        -> CleanerResult<()>;
}

impl<T: CleanerWorkerPort + ?Sized> CleanerWorkerPort for Arc<T> {
    fn create_worker(&self) -> CleanerResult<WorkerId> {
        (**self).create_worker()
    }

    fn shutdown_worker(&self, id: WorkerId, execute_scheduled_cleaners: bool) -> CleanerResult<()> {
        (**self).shutdown_worker(id, execute_scheduled_cleaners)
    }
}

impl<T: CleanerWorkerPort + ?Sized> CleanerWorkerPort for &T {
    fn create_worker(&self) -> CleanerResult<WorkerId> {
        (**self).create_worker()
    }

    fn shutdown_worker(&self, id: WorkerId, execute_scheduled_cleaners: bool) -> CleanerResult<()> {
        (**self).shutdown_worker(id, execute_scheduled_cleaners)
    }
}
