//! One OS thread running queued cleanup actions

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use finalizer_common::error::CommonError;
use finalizer_core::{CleanerError, CleanerResult};
use finalizer_domain::{CleanerConfig, WorkerId, WorkerMetricsSnapshot};
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use super::metrics::WorkerMetrics;
use super::queue::{CleanupAction, PendingCleanupQueue};

/// A running cleaner worker
///
/// Executes actions in submission order on a dedicated thread. A panicking
/// action is caught and counted; the worker keeps going.
#[derive(Debug)]
pub struct CleanerWorker {
    id: WorkerId,
    queue: Arc<PendingCleanupQueue>,
    metrics: Arc<WorkerMetrics>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl CleanerWorker {
    /// Start the worker thread
    ///
    /// # Errors
    /// `CommonError::Io` naming `spawn_cleaner_worker` when the OS refuses
    /// the thread.
    pub fn spawn(id: WorkerId, config: &CleanerConfig) -> CleanerResult<Self> {
        let queue = Arc::new(PendingCleanupQueue::new());
        let metrics = Arc::new(WorkerMetrics::new());

        let mut builder = thread::Builder::new().name(config.thread_name.clone());
        if let Some(stack_size) = config.stack_size {
            builder = builder.stack_size(stack_size);
        }

        let handle = {
            let queue = Arc::clone(&queue);
            let metrics = Arc::clone(&metrics);
            builder
                .spawn(move || run_worker_loop(id, &queue, &metrics))
                .map_err(|err| CommonError::io_op("spawn_cleaner_worker", err.to_string()))?
        };

        debug!(worker_id = %id, thread_name = %config.thread_name, "cleaner worker thread started");
        Ok(Self { id, queue, metrics, handle: Mutex::new(Some(handle)) })
    }

    /// Identity of this worker
    pub fn id(&self) -> WorkerId {
        self.id
    }

    /// Queue a cleanup action
    ///
    /// # Errors
    /// `CleanerError::NotAccepting` once shutdown has started.
    pub fn schedule(&self, action: CleanupAction) -> CleanerResult<()> {
        if self.queue.push(action).is_err() {
            warn!(worker_id = %self.id, "cleanup rejected, worker is shutting down");
            return Err(CleanerError::NotAccepting(self.id));
        }
        self.metrics.record_scheduled();
        Ok(())
    }

    /// Counters for this worker
    pub fn metrics(&self) -> WorkerMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Actions waiting to run
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Whether the worker thread has been joined
    pub fn is_stopped(&self) -> bool {
        self.handle.lock().is_none()
    }

    /// Stop the worker and wait for its thread to exit
    ///
    /// With `drain` set, every action queued before this call runs first.
    /// Stopping an already stopped worker does nothing.
    ///
    /// # Errors
    /// - `CommonError::InvalidState` when called from the worker thread itself
    /// - `CleanerError::WorkerPanicked` if the thread died outside an action
    pub fn shutdown(&self, drain: bool) -> CleanerResult<()> {
        let Some(handle) = self.handle.lock().take() else {
            debug!(worker_id = %self.id, "cleaner worker already stopped");
            return Ok(());
        };

        if handle.thread().id() == thread::current().id() {
            *self.handle.lock() = Some(handle);
            return Err(CommonError::invalid_state("cleaner worker cannot join itself").into());
        }

        let discarded = self.queue.request_stop(drain);
        if discarded > 0 {
            self.metrics.record_discarded(discarded as u64);
            debug!(worker_id = %self.id, discarded, "discarded pending cleanups");
        }

        handle.join().map_err(|_| CleanerError::WorkerPanicked(self.id))?;
        info!(worker_id = %self.id, drain, metrics = ?self.metrics.snapshot(), "cleaner worker stopped");
        Ok(())
    }
}

impl Drop for CleanerWorker {
    fn drop(&mut self) {
        // The thread exits on its own once the queue reports stop.
        if self.handle.get_mut().is_some() {
            let discarded = self.queue.request_stop(false);
            self.metrics.record_discarded(discarded as u64);
        }
    }
}

fn run_worker_loop(id: WorkerId, queue: &PendingCleanupQueue, metrics: &WorkerMetrics) {
    while let Some(action) = queue.next() {
        match panic::catch_unwind(AssertUnwindSafe(action)) {
            Ok(()) => metrics.record_executed(),
            Err(payload) => {
                metrics.record_panicked();
                error!(worker_id = %id, panic = %panic_message(payload.as_ref()), "cleanup action panicked");
            }
        }
    }
    debug!(worker_id = %id, "cleaner worker loop exited");
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&'static str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
