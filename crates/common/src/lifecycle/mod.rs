//! Lifecycle management utilities for lazily created components
//!
//! - **[`state`]**: lock-free `Uncreated -> Initializing -> Created ->
//!   ShutDown` cell with single-winner creation and a terminal shutdown state

pub mod state;

// Re-export commonly used types for convenience
pub use state::{LifecycleCell, LifecycleState, TransitionError};
