//! Thread-backed implementation of `CleanerWorkerPort`

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use finalizer_core::{CleanerError, CleanerResult, CleanerWorkerPort};
use finalizer_domain::{CleanerConfig, WorkerId, WorkerMetricsSnapshot};
use parking_lot::RwLock;
use tracing::info;

use super::thread_worker::CleanerWorker;

/// Spawns [`CleanerWorker`] threads and keeps a handle per identity
///
/// Identities start at 1 and are never reused. Stopped workers stay in the
/// registry so their final counters remain readable.
#[derive(Debug)]
pub struct ThreadCleanerBackend {
    config: CleanerConfig,
    next_id: AtomicU32,
    workers: RwLock<HashMap<WorkerId, Arc<CleanerWorker>>>,
}

impl ThreadCleanerBackend {
    /// Create a backend that spawns workers with `config`
    ///
    /// # Errors
    /// Returns `CleanerError::Domain` when the configuration is invalid.
    pub fn new(config: CleanerConfig) -> CleanerResult<Self> {
        config.validate()?;
        Ok(Self { config, next_id: AtomicU32::new(1), workers: RwLock::new(HashMap::new()) })
    }

    /// Configuration used for new workers
    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    /// Handle to a registered worker
    ///
    /// # Errors
    /// `CleanerError::UnknownWorker` if `id` was never created here.
    pub fn worker(&self, id: WorkerId) -> CleanerResult<Arc<CleanerWorker>> {
        self.workers.read().get(&id).cloned().ok_or(CleanerError::UnknownWorker(id))
    }

    /// Queue `action` on worker `id`
    ///
    /// # Errors
    /// `CleanerError::UnknownWorker` or `CleanerError::NotAccepting`.
    pub fn schedule_cleanup<F>(&self, id: WorkerId, action: F) -> CleanerResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.worker(id)?.schedule(Box::new(action))
    }

    /// Counters for worker `id`
    ///
    /// # Errors
    /// `CleanerError::UnknownWorker` if `id` was never created here.
    pub fn metrics(&self, id: WorkerId) -> CleanerResult<WorkerMetricsSnapshot> {
        Ok(self.worker(id)?.metrics())
    }

    /// Number of workers ever created
    pub fn worker_count(&self) -> usize {
        self.workers.read().len()
    }
}

impl CleanerWorkerPort for ThreadCleanerBackend {
    fn create_worker(&self) -> CleanerResult<WorkerId> {
        let id = WorkerId::new(self.next_id.fetch_add(1, Ordering::Relaxed))?;
        let worker = CleanerWorker::spawn(id, &self.config)?;

        self.workers.write().insert(id, Arc::new(worker));
        info!(worker_id = %id, thread_name = %self.config.thread_name, "spawned cleaner worker");
        Ok(id)
    }

    fn shutdown_worker(&self, id: WorkerId, execute_scheduled_cleaners: bool) -> CleanerResult<()> {
        // Joined without holding the registry lock.
        let worker = self.worker(id)?;
        worker.shutdown(execute_scheduled_cleaners)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    #[test]
    fn test_rejects_invalid_config() {
        let config = CleanerConfig { thread_name: String::new(), ..Default::default() };
        assert!(matches!(ThreadCleanerBackend::new(config), Err(CleanerError::Domain(_))));
    }

    #[test]
    fn test_ids_start_at_one_and_increase() {
        let backend = ThreadCleanerBackend::new(CleanerConfig::default()).unwrap();
        let first = backend.create_worker().unwrap();
        let second = backend.create_worker().unwrap();

        assert_eq!((first.get(), second.get()), (1, 2));
        assert_eq!(backend.worker_count(), 2);

        backend.shutdown_worker(first, false).unwrap();
        backend.shutdown_worker(second, false).unwrap();
    }

    #[cfg(all(target_os = "linux", target_pointer_width = "64"))]
    #[test]
    fn test_spawn_failure_keeps_io_error() {
        use finalizer_common::error::CommonError;

        // Larger than the user address space.
        let config = CleanerConfig { stack_size: Some(1 << 48), ..Default::default() };
        let backend = ThreadCleanerBackend::new(config).unwrap();

        match backend.create_worker() {
            Err(CleanerError::Common(CommonError::Io { operation, .. })) => {
                assert_eq!(operation.as_deref(), Some("spawn_cleaner_worker"));
            }
            other => panic!("expected an I/O spawn error, got {other:?}"),
        }
        assert_eq!(backend.worker_count(), 0);
    }

    #[test]
    fn test_unknown_worker() {
        let backend = ThreadCleanerBackend::new(CleanerConfig::default()).unwrap();
        let missing = WorkerId::new(99).unwrap();

        assert_eq!(backend.metrics(missing), Err(CleanerError::UnknownWorker(missing)));
        assert_eq!(backend.schedule_cleanup(missing, || {}), Err(CleanerError::UnknownWorker(missing)));
        assert_eq!(backend.shutdown_worker(missing, true), Err(CleanerError::UnknownWorker(missing)));
    }

    #[test]
    fn test_drain_runs_scheduled_cleanups() {
        let backend = ThreadCleanerBackend::new(CleanerConfig::default()).unwrap();
        let id = backend.create_worker().unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..10 {
            let counter = Arc::clone(&counter);
            backend
                .schedule_cleanup(id, move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
        }
        backend.shutdown_worker(id, true).unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 10);
        let metrics = backend.metrics(id).unwrap();
        assert_eq!((metrics.scheduled, metrics.executed, metrics.pending()), (10, 10, 0));
    }
}
