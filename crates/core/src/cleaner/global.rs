//! Process-wide cleaner worker
//!
//! One [`CleanerWorkerManager`] per process, installed once at startup with
//! the port that knows how to build workers. Mutators then call
//! [`get_cleaner_worker`] from anywhere and teardown calls
//! [`shutdown_cleaners`].

use std::sync::Arc;

use finalizer_domain::WorkerId;
use once_cell::sync::OnceCell;
use tracing::{debug, info};

use super::errors::{CleanerError, CleanerResult};
use super::manager::CleanerWorkerManager;
use super::ports::CleanerWorkerPort;

/// Manager type held by the process-wide registry
pub type GlobalCleanerManager = CleanerWorkerManager<Arc<dyn CleanerWorkerPort>>;

static GLOBAL_MANAGER: OnceCell<GlobalCleanerManager> = OnceCell::new();

/// Install the port backing the process-wide manager
///
/// # Errors
/// `CleanerError::AlreadyInstalled` on every call after the first.
pub fn install_global(port: Arc<dyn CleanerWorkerPort>) -> CleanerResult<()> {
    GLOBAL_MANAGER
        .set(CleanerWorkerManager::new(port))
        .map_err(|_| CleanerError::AlreadyInstalled)?;
    info!("cleaner worker port installed");
    Ok(())
}

/// The process-wide manager, if installed
pub fn global_manager() -> Option<&'static GlobalCleanerManager> {
    GLOBAL_MANAGER.get()
}

/// Get or create the process-wide cleaner worker
///
/// Same contract as [`CleanerWorkerManager::get_or_create_worker`].
///
/// # Errors
/// `CleanerError::NotInstalled` before [`install_global`], otherwise the
/// manager's errors.
pub fn get_cleaner_worker() -> CleanerResult<WorkerId> {
    global_manager().ok_or(CleanerError::NotInstalled)?.get_or_create_worker()
}

/// Shut down the process-wide cleaner worker
///
/// Nothing to do when no port was ever installed.
///
/// # Errors
/// Propagates the port's shutdown error.
pub fn shutdown_cleaners(execute_scheduled_cleaners: bool) -> CleanerResult<()> {
    match global_manager() {
        Some(manager) => manager.shutdown_worker(execute_scheduled_cleaners),
        None => {
            debug!("no cleaner worker port installed, nothing to shut down");
            Ok(())
        }
    }
}

/// Return the process-wide lifecycle to `Uncreated`
///
/// The installed port is kept.
#[cfg(any(test, feature = "test-utils"))]
pub fn reset_cleaner_worker_for_tests() {
    if let Some(manager) = global_manager() {
        manager.reset_for_tests();
    }
}
