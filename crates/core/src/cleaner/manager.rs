//! Lazy, exactly-once cleaner worker lifecycle
//!
//! [`CleanerWorkerManager`] owns one [`LifecycleCell`] and the port used to
//! create and stop the worker. Any number of threads may ask for the worker
//! concurrently: one of them wins the right to run the factory, the others
//! wait for the published identity.
//!
//! ```text
//! Uncreated --get--> Initializing --factory ok--> Created(id) --shutdown--> ShutDown
//!     ^                   |                                                    |
//!     +--factory err/panic+                                                    |
//!     +------------------------------ reset (tests) ---------------------------+
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use finalizer_common::error::CommonError;
use finalizer_common::lifecycle::{LifecycleCell, LifecycleState};
use finalizer_domain::{ManagerStatsSnapshot, ThreadState, WorkerId};
use tracing::{debug, error, info, warn};

use super::context::assert_thread_state;
use super::errors::{CleanerError, CleanerResult};
use super::ports::CleanerWorkerPort;

#[derive(Debug, Default)]
struct ManagerStats {
    factory_invocations: AtomicU64,
    factory_failures: AtomicU64,
    shutdown_invocations: AtomicU64,
    contended_waits: AtomicU64,
}

impl ManagerStats {
    fn snapshot(&self) -> ManagerStatsSnapshot {
        ManagerStatsSnapshot {
            factory_invocations: self.factory_invocations.load(Ordering::Relaxed),
            factory_failures: self.factory_failures.load(Ordering::Relaxed),
            shutdown_invocations: self.shutdown_invocations.load(Ordering::Relaxed),
            contended_waits: self.contended_waits.load(Ordering::Relaxed),
        }
    }
}

/// Rolls an in-flight creation back to `Uncreated` unless disarmed.
///
/// Covers both an `Err` from the factory and a panic unwinding through it.
struct CreationGuard<'a> {
    cell: &'a LifecycleCell,
    failures: &'a AtomicU64,
    armed: bool,
}

impl CreationGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for CreationGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.failures.fetch_add(1, Ordering::Relaxed);
            if let Err(err) = self.cell.abort() {
                error!(error = %err, "failed to roll back cleaner worker creation");
            }
        }
    }
}

/// Get-or-create and shutdown for the single cleaner worker
pub struct CleanerWorkerManager<P> {
    cell: LifecycleCell,
    port: P,
    stats: ManagerStats,
}

impl<P> std::fmt::Debug for CleanerWorkerManager<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CleanerWorkerManager")
            .field("state", &self.cell.load())
            .field("stats", &self.stats.snapshot())
            .finish_non_exhaustive()
    }
}

impl<P: CleanerWorkerPort> CleanerWorkerManager<P> {
    /// Create a manager in the `Uncreated` state
    pub fn new(port: P) -> Self {
        Self { cell: LifecycleCell::new(), port, stats: ManagerStats::default() }
    }

    /// The port this manager drives
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Return the worker identity, creating the worker on first use
    ///
    /// The caller must be in [`ThreadState::Native`]. Exactly one caller per
    /// epoch runs the factory; concurrent callers wait and receive the same
    /// identity.
    ///
    /// # Errors
    /// - `CleanerError::ShutDown` once the lifecycle has been shut down
    /// - whatever the port's `create_worker` returned, unchanged, to the caller
    ///   that ran it; the lifecycle is left `Uncreated` so a later call retries
    pub fn get_or_create_worker(&self) -> CleanerResult<WorkerId> {
        assert_thread_state(ThreadState::Native);

        let mut waited = false;
        loop {
            match self.cell.load() {
                LifecycleState::Created(raw) => return published_id(raw),
                LifecycleState::ShutDown => return Err(CleanerError::ShutDown),
                LifecycleState::Initializing => {
                    if !waited {
                        waited = true;
                        self.stats.contended_waits.fetch_add(1, Ordering::Relaxed);
                        debug!("cleaner worker creation in flight, waiting");
                    }
                    self.cell.wait_while_initializing();
                }
                LifecycleState::Uncreated => {
                    if self.cell.try_begin().is_ok() {
                        return self.create_as_winner();
                    }
                }
            }
        }
    }

    fn create_as_winner(&self) -> CleanerResult<WorkerId> {
        let guard = CreationGuard {
            cell: &self.cell,
            failures: &self.stats.factory_failures,
            armed: true,
        };
        self.stats.factory_invocations.fetch_add(1, Ordering::Relaxed);

        let id = match self.port.create_worker() {
            Ok(id) => id,
            Err(err) => {
                error!(error = %err, "cleaner worker creation failed");
                return Err(err);
            }
        };

        self.cell.publish(id.get()).map_err(CommonError::from)?;
        guard.disarm();
        info!(worker_id = %id, "cleaner worker created");
        Ok(id)
    }

    /// Shut the worker down, if one was ever created
    ///
    /// The lifecycle moves to `ShutDown` before the port is called, so a
    /// concurrent get-or-create fails instead of creating a new worker. The
    /// flag is passed to the port unchanged. Shutting down a lifecycle that
    /// never created a worker calls nothing and leaves it `Uncreated`;
    /// shutting down twice is a no-op.
    ///
    /// # Errors
    /// Whatever the port's `shutdown_worker` returned. The lifecycle stays
    /// `ShutDown` either way.
    pub fn shutdown_worker(&self, execute_scheduled_cleaners: bool) -> CleanerResult<()> {
        match self.cell.seal() {
            LifecycleState::Uncreated => {
                debug!("no cleaner worker to shut down");
                Ok(())
            }
            LifecycleState::Created(raw) => {
                let id = published_id(raw)?;
                self.stats.shutdown_invocations.fetch_add(1, Ordering::Relaxed);
                info!(worker_id = %id, execute_scheduled_cleaners, "shutting down cleaner worker");
                self.port.shutdown_worker(id, execute_scheduled_cleaners)
            }
            LifecycleState::ShutDown => {
                warn!("cleaner worker already shut down");
                Ok(())
            }
            LifecycleState::Initializing => Err(CommonError::invalid_state_in(
                "initializing",
                "seal returned while a creation was in flight",
            )
            .into()),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> LifecycleState<WorkerId> {
        match self.cell.load() {
            LifecycleState::Uncreated => LifecycleState::Uncreated,
            LifecycleState::Initializing => LifecycleState::Initializing,
            // Zero is never published.
            LifecycleState::Created(raw) => {
                WorkerId::new(raw).map_or(LifecycleState::Uncreated, LifecycleState::Created)
            }
            LifecycleState::ShutDown => LifecycleState::ShutDown,
        }
    }

    /// Diagnostic counters
    pub fn stats(&self) -> ManagerStatsSnapshot {
        self.stats.snapshot()
    }

    /// Return the lifecycle to `Uncreated`
    ///
    /// The previous worker, if any, is forgotten without being shut down.
    /// Only valid while no other thread is using the manager.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn reset_for_tests(&self) {
        debug!(previous = %self.cell.load(), "resetting cleaner worker lifecycle");
        self.cell.reset();
    }
}

fn published_id(raw: u32) -> CleanerResult<WorkerId> {
    WorkerId::new(raw).map_err(|err| {
        CommonError::internal_with_context(err.to_string(), "cleaner lifecycle cell").into()
    })
}

#[cfg(test)]
mod tests {
    //! Unit tests for the lifecycle manager
    //!
    //! Uses a small counting port; the contention and mock-driven scenarios
    //! live in `tests/cleaner_lifecycle.rs`.

    use std::sync::atomic::AtomicU32;
    use std::sync::Mutex;

    use super::*;
    use crate::cleaner::context::ThreadStateGuard;

    #[derive(Default)]
    struct CountingPort {
        next: AtomicU32,
        fail_next: AtomicU32,
        shutdowns: Mutex<Vec<(WorkerId, bool)>>,
    }

    impl CleanerWorkerPort for CountingPort {
        fn create_worker(&self) -> CleanerResult<WorkerId> {
            if self.fail_next.swap(0, Ordering::SeqCst) > 0 {
                return Err(CleanerError::CreationFailed("no threads left".into()));
            }
            Ok(WorkerId::new(self.next.fetch_add(1, Ordering::SeqCst) + 1)?)
        }

        fn shutdown_worker(&self, id: WorkerId, drain: bool) -> CleanerResult<()> {
            self.shutdowns.lock().unwrap().push((id, drain));
            Ok(())
        }
    }

    #[test]
    fn test_create_once_then_cached() {
        let _native = ThreadStateGuard::native();
        let manager = CleanerWorkerManager::new(CountingPort::default());

        let first = manager.get_or_create_worker().unwrap();
        let second = manager.get_or_create_worker().unwrap();

        assert_eq!(first, second);
        assert_eq!(manager.state(), LifecycleState::Created(first));
        assert_eq!(manager.stats().factory_invocations, 1);
    }

    #[test]
    fn test_failure_rolls_back_and_retries() {
        let _native = ThreadStateGuard::native();
        let port = CountingPort::default();
        port.fail_next.store(1, Ordering::SeqCst);
        let manager = CleanerWorkerManager::new(port);

        let err = manager.get_or_create_worker().unwrap_err();
        assert_eq!(err, CleanerError::CreationFailed("no threads left".into()));
        assert_eq!(manager.state(), LifecycleState::Uncreated);

        assert_eq!(manager.get_or_create_worker().unwrap().get(), 1);
        let stats = manager.stats();
        assert_eq!(stats.factory_invocations, 2);
        assert_eq!(stats.factory_failures, 1);
    }

    #[test]
    fn test_shutdown_then_get_fails() {
        let _native = ThreadStateGuard::native();
        let manager = CleanerWorkerManager::new(CountingPort::default());
        let id = manager.get_or_create_worker().unwrap();

        manager.shutdown_worker(false).unwrap();
        manager.shutdown_worker(true).unwrap();

        assert_eq!(*manager.port().shutdowns.lock().unwrap(), vec![(id, false)]);
        assert_eq!(manager.get_or_create_worker(), Err(CleanerError::ShutDown));
        assert!(manager.state().is_shut_down());
    }

    #[test]
    fn test_shutdown_before_create_keeps_uncreated() {
        let _native = ThreadStateGuard::native();
        let manager = CleanerWorkerManager::new(CountingPort::default());

        manager.shutdown_worker(true).unwrap();

        assert_eq!(manager.state(), LifecycleState::Uncreated);
        assert!(manager.port().shutdowns.lock().unwrap().is_empty());
        assert_eq!(manager.get_or_create_worker().unwrap().get(), 1);
    }

    #[test]
    fn test_reset_starts_new_epoch() {
        let _native = ThreadStateGuard::native();
        let manager = CleanerWorkerManager::new(CountingPort::default());
        manager.get_or_create_worker().unwrap();
        manager.shutdown_worker(true).unwrap();

        manager.reset_for_tests();

        assert_eq!(manager.state(), LifecycleState::Uncreated);
        assert_eq!(manager.get_or_create_worker().unwrap().get(), 2);
    }
}
