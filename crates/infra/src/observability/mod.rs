//! Observability infrastructure
//!
//! - **[`logging`]**: `tracing` subscriber installation

pub mod logging;

pub use logging::{build_filter, init_json_logging, init_logging};
