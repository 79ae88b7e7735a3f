//! Per-worker cleanup counters
//!
//! Updated by the scheduling path and the worker thread; read through
//! [`WorkerMetrics::snapshot`].

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use finalizer_domain::WorkerMetricsSnapshot;

/// Cleanup queue counters for one worker
#[derive(Debug, Default)]
pub struct WorkerMetrics {
    scheduled: AtomicU64,
    executed: AtomicU64,
    discarded: AtomicU64,
    panicked: AtomicU64,
}

impl WorkerMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accepted action
    pub fn record_scheduled(&self) {
        self.scheduled.fetch_add(1, AtomicOrdering::Relaxed);
    }

    /// Record an action that ran to completion
    pub fn record_executed(&self) {
        self.executed.fetch_add(1, AtomicOrdering::Relaxed);
    }

    /// Record actions dropped at shutdown
    pub fn record_discarded(&self, count: u64) {
        self.discarded.fetch_add(count, AtomicOrdering::Relaxed);
    }

    /// Record a panicking action
    pub fn record_panicked(&self) {
        self.panicked.fetch_add(1, AtomicOrdering::Relaxed);
    }

    /// Point-in-time copy of the counters
    pub fn snapshot(&self) -> WorkerMetricsSnapshot {
        WorkerMetricsSnapshot {
            scheduled: self.scheduled.load(AtomicOrdering::Relaxed),
            executed: self.executed.load(AtomicOrdering::Relaxed),
            discarded: self.discarded.load(AtomicOrdering::Relaxed),
            panicked: self.panicked.load(AtomicOrdering::Relaxed),
        }
    }
}
