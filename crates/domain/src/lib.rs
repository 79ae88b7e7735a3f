//! # Finalizer Domain
//!
//! Domain types for the deferred finalization subsystem.
//!
//! This crate contains:
//! - Worker identity and execution context types
//! - Diagnostic statistics snapshots
//! - Domain error types and Result definitions
//! - Cleaner worker configuration
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other finalizer crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
