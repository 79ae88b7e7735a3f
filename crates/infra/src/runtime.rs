//! Cleaner runtime facade
//!
//! Wires a [`CleanerConfig`], a [`ThreadCleanerBackend`] and a
//! [`CleanerWorkerManager`] so callers can schedule cleanups without caring
//! whether the worker exists yet.
//!
//! ```no_run
//! use finalizer_domain::CleanerConfig;
//! use finalizer_infra::CleanerRuntime;
//!
//! # fn main() -> finalizer_core::CleanerResult<()> {
//! let runtime = CleanerRuntime::start(CleanerConfig::default())?;
//! runtime.schedule(|| println!("released native handle"))?;
//! runtime.shutdown()?;
//!
//! // Or load the configuration and install logging in one step
//! let runtime = CleanerRuntime::bootstrap()?;
//! runtime.shutdown()?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use finalizer_common::lifecycle::LifecycleState;
use finalizer_core::{CleanerResult, CleanerWorkerManager, ThreadStateGuard};
use finalizer_domain::{CleanerConfig, ManagerStatsSnapshot, WorkerId, WorkerMetricsSnapshot};
use tracing::{debug, info};

use crate::config;
use crate::observability::init_logging;
use crate::worker::ThreadCleanerBackend;

/// Lazily started cleaner worker with a thread backend
#[derive(Debug)]
pub struct CleanerRuntime {
    backend: Arc<ThreadCleanerBackend>,
    manager: CleanerWorkerManager<Arc<ThreadCleanerBackend>>,
}

impl CleanerRuntime {
    /// Validate `config` and prepare the runtime
    ///
    /// No thread is started until the first [`worker`](Self::worker) or
    /// [`schedule`](Self::schedule) call.
    ///
    /// # Errors
    /// Returns `CleanerError::Domain` when the configuration is invalid.
    pub fn start(config: CleanerConfig) -> CleanerResult<Self> {
        let backend = Arc::new(ThreadCleanerBackend::new(config)?);
        let manager = CleanerWorkerManager::new(Arc::clone(&backend));
        info!(thread_name = %backend.config().thread_name, "cleaner runtime ready");
        Ok(Self { backend, manager })
    }

    /// Install logging with `config.log_filter`, then [`start`](Self::start)
    ///
    /// A subscriber installed earlier in the process is kept.
    ///
    /// # Errors
    /// Returns `CleanerError::Domain` when the configuration is invalid.
    pub fn start_logged(config: CleanerConfig) -> CleanerResult<Self> {
        if !init_logging(&config.log_filter) {
            debug!(filter = %config.log_filter, "tracing subscriber already installed");
        }
        Self::start(config)
    }

    /// Load the configuration from the environment or a config file, then
    /// [`start_logged`](Self::start_logged)
    ///
    /// # Errors
    /// Returns `CleanerError::Domain` when loading or validation fails.
    pub fn bootstrap() -> CleanerResult<Self> {
        Self::start_logged(config::load()?)
    }

    /// Configuration in effect
    pub fn config(&self) -> &CleanerConfig {
        self.backend.config()
    }

    /// The thread backend
    pub fn backend(&self) -> &Arc<ThreadCleanerBackend> {
        &self.backend
    }

    /// The lifecycle manager
    pub fn manager(&self) -> &CleanerWorkerManager<Arc<ThreadCleanerBackend>> {
        &self.manager
    }

    /// Identity of the worker, starting it if needed
    ///
    /// The calling thread is switched to `Native` for the call.
    ///
    /// # Errors
    /// `CleanerError::ShutDown` after shutdown, or the spawn failure.
    pub fn worker(&self) -> CleanerResult<WorkerId> {
        let _native = ThreadStateGuard::native();
        self.manager.get_or_create_worker()
    }

    /// Queue a cleanup on the worker, starting it if needed
    ///
    /// # Errors
    /// `CleanerError::ShutDown` or `CleanerError::NotAccepting` once shutdown
    /// has begun.
    pub fn schedule<F>(&self, action: F) -> CleanerResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let id = self.worker()?;
        self.backend.schedule_cleanup(id, action)
    }

    /// Counters for worker `id`
    ///
    /// # Errors
    /// `CleanerError::UnknownWorker` if this runtime never created `id`.
    pub fn worker_metrics(&self, id: WorkerId) -> CleanerResult<WorkerMetricsSnapshot> {
        self.backend.metrics(id)
    }

    /// Lifecycle counters
    pub fn stats(&self) -> ManagerStatsSnapshot {
        self.manager.stats()
    }

    /// Current lifecycle state
    pub fn state(&self) -> LifecycleState<WorkerId> {
        self.manager.state()
    }

    /// Shut down using the configured drain policy
    ///
    /// # Errors
    /// Propagates the worker's shutdown error.
    pub fn shutdown(&self) -> CleanerResult<()> {
        self.shutdown_with(self.config().drain_on_shutdown)
    }

    /// Shut down, running (`true`) or dropping (`false`) queued cleanups
    ///
    /// # Errors
    /// Propagates the worker's shutdown error.
    pub fn shutdown_with(&self, execute_scheduled_cleaners: bool) -> CleanerResult<()> {
        self.manager.shutdown_worker(execute_scheduled_cleaners)
    }
}
