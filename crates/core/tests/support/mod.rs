//! Shared test helpers for `finalizer-core` integration tests.
//!
//! Provides a scripted mock of the worker port so lifecycle tests can state
//! exactly how many factory and shutdown calls they expect.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use finalizer_common::testing::MockFn;
use finalizer_core::{CleanerError, CleanerResult, CleanerWorkerPort};
use finalizer_domain::WorkerId;

/// Worker id every test factory hands out by default
pub const TEST_WORKER_ID: u32 = 42;

/// Shorthand for a known-valid worker id
pub fn worker_id(raw: u32) -> WorkerId {
    WorkerId::new(raw).expect("test worker ids are non-zero")
}

/// Scripted `CleanerWorkerPort`.
///
/// `create` answers `create_worker` and `shutdown` answers
/// `shutdown_worker((id, drain))`. An unscripted create fails; an unscripted
/// shutdown succeeds.
#[derive(Default)]
pub struct MockCleanerWorkerPort {
    pub create: MockFn<(), CleanerResult<WorkerId>>,
    pub shutdown: MockFn<(WorkerId, bool), CleanerResult<()>>,
    create_delay: Option<Duration>,
    panic_on_next_create: AtomicBool,
}

impl MockCleanerWorkerPort {
    /// Port whose factory always returns `raw`
    pub fn creating(raw: u32) -> Self {
        Self { create: MockFn::new().returning(Ok(worker_id(raw))), ..Default::default() }
    }

    /// Hold the factory for `delay` so concurrent callers pile up behind it
    pub fn with_create_delay(mut self, delay: Duration) -> Self {
        self.create_delay = Some(delay);
        self
    }

    /// Make the next factory call panic instead of answering
    pub fn panic_on_next_create(&self) {
        self.panic_on_next_create.store(true, Ordering::SeqCst);
    }
}

impl CleanerWorkerPort for MockCleanerWorkerPort {
    fn create_worker(&self) -> CleanerResult<WorkerId> {
        if let Some(delay) = self.create_delay {
            std::thread::sleep(delay);
        }
        let answer = self.create.call(());
        if self.panic_on_next_create.swap(false, Ordering::SeqCst) {
            panic!("worker factory exploded");
        }
        answer.unwrap_or_else(|| Err(CleanerError::CreationFailed("unscripted create".into())))
    }

    fn shutdown_worker(&self, id: WorkerId, execute_scheduled_cleaners: bool) -> CleanerResult<()> {
        self.shutdown.call((id, execute_scheduled_cleaners)).unwrap_or(Ok(()))
    }
}
