//! Error types for the cleaner worker lifecycle
//!
//! Composes with [`CommonError`] for configuration, I/O and invalid state
//! failures and adds the lifecycle-specific cases.

use finalizer_common::error::{CommonError, ErrorSeverity};
use finalizer_common::{impl_error_classification, impl_error_conversion};
use finalizer_domain::{DomainError, WorkerId};
use thiserror::Error;

/// Errors raised by the cleaner lifecycle and its worker backends
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CleanerError {
    /// The lifecycle reached `ShutDown`; no worker will be created again
    #[error("cleaner worker has been shut down")]
    ShutDown,

    /// The worker factory could not produce a worker
    #[error("cleaner worker creation failed: {0}")]
    CreationFailed(String),

    /// No worker with this identity is registered
    #[error("unknown cleaner worker {0}")]
    UnknownWorker(WorkerId),

    /// The worker is stopping and accepts no further cleanups
    #[error("cleaner worker {0} is not accepting cleanups")]
    NotAccepting(WorkerId),

    /// The worker thread died outside a cleanup action
    #[error("cleaner worker {0} panicked")]
    WorkerPanicked(WorkerId),

    /// The process-wide registry has no port yet
    #[error("no cleaner worker port installed")]
    NotInstalled,

    /// The process-wide registry already has a port
    #[error("a cleaner worker port is already installed")]
    AlreadyInstalled,

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Common(#[from] CommonError),
}

/// Result type for cleaner operations
pub type CleanerResult<T> = Result<T, CleanerError>;

impl_error_conversion!(CleanerError, Common);
impl_error_classification!(CleanerError, Common,
    Self::ShutDown | Self::NotAccepting(_) => {
        retryable: false,
        severity: ErrorSeverity::Warning,
        critical: false,
    },
    Self::CreationFailed(_) => {
        retryable: true,
        severity: ErrorSeverity::Error,
        critical: false,
    },
    Self::UnknownWorker(_) | Self::NotInstalled | Self::AlreadyInstalled | Self::Domain(_) => {
        retryable: false,
        severity: ErrorSeverity::Error,
        critical: false,
    },
    Self::WorkerPanicked(_) => {
        retryable: false,
        severity: ErrorSeverity::Critical,
        critical: true,
    }
);

impl CleanerError {
    /// Whether this error came from the lifecycle having been shut down
    pub fn is_shut_down(&self) -> bool {
        matches!(self, Self::ShutDown)
    }
}
