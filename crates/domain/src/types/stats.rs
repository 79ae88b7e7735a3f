//! Statistics types for the cleaner subsystem
//!
//! - Lifecycle manager counters
//! - Per-worker queue counters

use serde::{Deserialize, Serialize};

/* -------------------------------------------------------------------------- */
/* Manager Statistics */
/* -------------------------------------------------------------------------- */

/// Lifecycle manager counters
///
/// Cumulative since the manager was built; a test reset does not clear them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerStatsSnapshot {
    /// Times the worker factory ran
    pub factory_invocations: u64,

    /// Factory runs that returned an error or panicked
    pub factory_failures: u64,

    /// Times the shutdown primitive ran
    pub shutdown_invocations: u64,

    /// Callers that found a creation in flight and had to wait
    pub contended_waits: u64,
}

/* -------------------------------------------------------------------------- */
/* Worker Statistics */
/* -------------------------------------------------------------------------- */

/// Cleanup queue counters for one worker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerMetricsSnapshot {
    /// Actions accepted onto the queue
    pub scheduled: u64,

    /// Actions that ran to completion
    pub executed: u64,

    /// Actions dropped unexecuted at shutdown
    pub discarded: u64,

    /// Actions that panicked while running
    pub panicked: u64,
}

impl WorkerMetricsSnapshot {
    /// Actions accepted but not yet accounted for
    pub fn pending(&self) -> u64 {
        self.scheduled.saturating_sub(self.executed + self.discarded + self.panicked)
    }
}
