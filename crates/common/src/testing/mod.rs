//! Testing utilities and helpers
//!
//! - **[`assertions`]**: assertion macros and helpers
//! - **[`concurrency`]**: start-gated thread harness for contention tests
//! - **[`mocks`]**: recording, scripted function mocks for port
//!   implementations
//!
//! ## Usage
//!
//! ```rust
//! use finalizer_common::testing::{run_concurrently, MockFn, DEFAULT_THREAD_COUNT};
//!
//! let factory = std::sync::Arc::new(MockFn::<(), u32>::new().returning(42));
//! let shared = std::sync::Arc::clone(&factory);
//!
//! let values = run_concurrently(DEFAULT_THREAD_COUNT, move |_| shared.call(()));
//! assert_eq!(values.len(), DEFAULT_THREAD_COUNT);
//! assert_eq!(factory.call_count(), DEFAULT_THREAD_COUNT);
//! ```

pub mod assertions;
pub mod concurrency;
pub mod mocks;

// Re-export commonly used items
// Note: Macros exported with #[macro_export] are available at crate root
pub use assertions::assert_all_equal;
pub use concurrency::{run_concurrently, DEFAULT_THREAD_COUNT};
pub use mocks::MockFn;
