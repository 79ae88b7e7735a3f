//! Domain types and models

pub mod stats;

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, Result};
use crate::impl_domain_status_conversions;

pub use stats::{ManagerStatsSnapshot, WorkerMetricsSnapshot};

// ============================================================================
// Worker identity
// ============================================================================

/// Identity of a cleaner worker
///
/// Opaque, non-zero and immutable once assigned. Zero is reserved so the
/// lifecycle cell can never publish a worker that looks unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct WorkerId(NonZeroU32);

impl WorkerId {
    /// Wrap a raw identifier
    ///
    /// # Errors
    /// Returns `DomainError::InvalidInput` for zero.
    pub fn new(raw: u32) -> Result<Self> {
        NonZeroU32::new(raw)
            .map(Self)
            .ok_or_else(|| DomainError::InvalidInput("worker id must be non-zero".to_string()))
    }

    /// Raw identifier value
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for WorkerId {
    type Error = DomainError;

    fn try_from(raw: u32) -> Result<Self> {
        Self::new(raw)
    }
}

impl From<WorkerId> for u32 {
    fn from(id: WorkerId) -> Self {
        id.get()
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Execution context
// ============================================================================

/// Execution state of a mutator thread
///
/// Requests for the cleaner worker must be made from `Native`, where the
/// thread may block without holding up the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadState {
    /// Running managed code (default for every thread)
    #[default]
    Runnable,
    /// Running native code, free to block
    Native,
}

impl_domain_status_conversions!(ThreadState {
    Runnable => "runnable",
    Native => "native",
});
