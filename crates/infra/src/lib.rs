//! # Finalizer Infrastructure
//!
//! Concrete implementations behind the `finalizer-core` ports.
//!
//! This crate contains:
//! - A thread-backed cleaner worker and its pending cleanup queue
//! - Configuration loading from environment and files
//! - `tracing` subscriber setup
//! - [`CleanerRuntime`], which wires all of the above together
//!
//! ## Architecture
//! - Implements `CleanerWorkerPort` from `finalizer-core`
//! - Owns every OS thread the subsystem starts

pub mod config;
pub mod observability;
pub mod runtime;
pub mod worker;

// Re-export commonly used items
pub use runtime::CleanerRuntime;
pub use worker::{CleanerWorker, CleanupAction, PendingCleanupQueue, ThreadCleanerBackend, WorkerMetrics};
