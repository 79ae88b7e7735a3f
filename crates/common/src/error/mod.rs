//! Common error types and utilities for the finalizer crates
//!
//! This module provides standardized error handling infrastructure shared by
//! the lifecycle manager and the worker backend.
//!
//! # Error Handling Architecture
//!
//! 1. **`CommonError`**: error patterns that appear across multiple crates
//!    (I/O while spawning workers, invalid lifecycle transitions, corrupted
//!    internal state)
//!
//! 2. **`ErrorClassification` trait**: a standard interface for classifying
//!    errors by their characteristics (retryability, severity, criticality)
//!
//! 3. **`ErrorSeverity` enum**: a unified severity level used when deciding
//!    how loudly to log an error
//!
//! ## Composition
//!
//! Module-specific errors **compose** with `CommonError` rather than
//! duplicating common patterns:
//!
//! ```rust,ignore
//! #[derive(Debug, Error)]
//! pub enum CleanerError {
//!     #[error("cleaner worker has been shut down")]
//!     ShutDown,
//!
//!     #[error(transparent)]
//!     Common(#[from] CommonError),
//! }
//!
//! impl_error_conversion!(CleanerError, Common);
//! impl_error_classification!(CleanerError, Common,
//!     Self::ShutDown => {
//!         retryable: false,
//!         severity: ErrorSeverity::Error,
//!         critical: false,
//!     }
//! );
//! ```
//!
//! ## Standard Error Patterns
//!
//! | Pattern | CommonError Variant | When to Use |
//! |---------|-------------------|-------------|
//! | **I/O** | `Io` | Thread spawn, joins |
//! | **Serialization** | `Serialization` | JSON diagnostics |
//! | **Invalid State** | `InvalidState` | Lifecycle transition from the wrong state |
//! | **Internal** | `Internal` | Bugs, invariant violations |
//!
//! ## ErrorSeverity Levels
//!
//! | Level | Use Case |
//! |-------|----------|
//! | **Info** | Expected conditions |
//! | **Warning** | Degraded but operational |
//! | **Error** | Failure requiring attention (I/O, bad transitions) |
//! | **Critical** | Integrity at risk (internal invariant violations) |

use std::fmt;
use std::time::Duration;

/// Standard result type using CommonError
pub type CommonResult<T> = Result<T, CommonError>;

/// Common error variants that appear across multiple modules
///
/// Embedded in module-specific error enums to keep messages and
/// classification consistent across the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// Serialization or deserialization errors
    Serialization { message: String, format: Option<String> },

    /// I/O errors (thread spawn)
    Io { message: String, operation: Option<String> },

    /// A state machine was asked to transition from the wrong state
    InvalidState { message: String, state: Option<String> },

    /// Internal errors that shouldn't normally occur
    Internal { message: String, context: Option<String> },
}

impl fmt::Display for CommonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serialization { message, format } => {
                if let Some(format) = format {
                    write!(f, "Serialization error ({}): {}", format, message)
                } else {
                    write!(f, "Serialization error: {}", message)
                }
            }
            Self::Io { message, operation } => {
                if let Some(op) = operation {
                    write!(f, "I/O error during '{}': {}", op, message)
                } else {
                    write!(f, "I/O error: {}", message)
                }
            }
            Self::InvalidState { message, state } => {
                if let Some(state) = state {
                    write!(f, "Invalid state '{}': {}", state, message)
                } else {
                    write!(f, "Invalid state: {}", message)
                }
            }
            Self::Internal { message, context } => {
                if let Some(ctx) = context {
                    write!(f, "Internal error in '{}': {}", ctx, message)
                } else {
                    write!(f, "Internal error: {}", message)
                }
            }
        }
    }
}

impl std::error::Error for CommonError {}

impl ErrorClassification for CommonError {
    fn is_retryable(&self) -> bool {
        false
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Serialization { .. } | Self::Io { .. } | Self::InvalidState { .. } => {
                ErrorSeverity::Error
            }
            Self::Internal { .. } => ErrorSeverity::Critical,
        }
    }

    fn is_critical(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

impl CommonError {
    /// Create a serialization error with format information
    pub fn serialization_format<S: Into<String>, F: Into<String>>(format: F, message: S) -> Self {
        Self::Serialization { message: message.into(), format: Some(format.into()) }
    }

    /// Create a simple I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io { message: message.into(), operation: None }
    }

    /// Create an I/O error for a specific operation
    pub fn io_op<S: Into<String>, O: Into<String>>(operation: O, message: S) -> Self {
        Self::Io { message: message.into(), operation: Some(operation.into()) }
    }

    /// Create an invalid state error
    pub fn invalid_state<S: Into<String>>(message: S) -> Self {
        Self::InvalidState { message: message.into(), state: None }
    }

    /// Create an invalid state error naming the observed state
    pub fn invalid_state_in<S: Into<String>, T: Into<String>>(state: T, message: S) -> Self {
        Self::InvalidState { message: message.into(), state: Some(state.into()) }
    }

    /// Create an internal error with context
    pub fn internal_with_context<S: Into<String>, C: Into<String>>(message: S, context: C) -> Self {
        Self::Internal { message: message.into(), context: Some(context.into()) }
    }

    /// Convert error to structured logging fields
    ///
    /// Returns key-value pairs suitable for structured logging.
    ///
    /// ```rust,ignore
    /// let err = CommonError::io_op("spawn_cleaner_worker", "resource unavailable");
    /// let fields = err.as_tracing_fields();
    /// tracing::error!(error_type = %fields[0].1, "worker creation failed");
    /// ```
    pub fn as_tracing_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("error_type", self.error_type_name().to_string())];

        let (message, detail) = match self {
            Self::Serialization { message, format } => (message, format.as_ref().map(|f| ("format", f))),
            Self::Io { message, operation } => (message, operation.as_ref().map(|o| ("operation", o))),
            Self::InvalidState { message, state } => (message, state.as_ref().map(|s| ("state", s))),
            Self::Internal { message, context } => (message, context.as_ref().map(|c| ("context", c))),
        };
        fields.push(("message", message.clone()));
        if let Some((key, value)) = detail {
            fields.push((key, value.clone()));
        }

        fields
    }

    /// Get the error type name for categorization
    pub fn error_type_name(&self) -> &'static str {
        match self {
            Self::Serialization { .. } => "serialization",
            Self::Io { .. } => "io",
            Self::InvalidState { .. } => "invalid_state",
            Self::Internal { .. } => "internal",
        }
    }
}

/// Error classification trait for consistent error handling across modules
///
/// Lets callers decide whether a failed operation can be attempted again
/// and how loudly to report it.
pub trait ErrorClassification {
    /// Check if this error is retryable
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    ///
    /// Critical errors indicate an internal invariant violation.
    fn is_critical(&self) -> bool;

    /// Get the suggested retry delay if applicable
    fn retry_after(&self) -> Option<Duration>;
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

// Standard conversions from common error types
impl From<serde_json::Error> for CommonError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization_format("JSON", err.to_string())
    }
}

impl From<std::io::Error> for CommonError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

/// Utility macro for creating error conversions from std types
///
/// `From<CommonError>` is typically handled by the `#[from]` attribute on the
/// variant; this macro adds conversions routed through `CommonError`.
///
/// ```rust,ignore
/// #[derive(Debug, thiserror::Error)]
/// pub enum MyError {
///     #[error(transparent)]
///     Common(#[from] CommonError),
/// }
///
/// impl_error_conversion!(MyError, Common);
/// ```
///
/// This generates:
/// - `From<serde_json::Error> for MyError` (via CommonError)
/// - `From<std::io::Error> for MyError` (via CommonError)
#[macro_export]
macro_rules! impl_error_conversion {
    // Standard variant - assumes #[from] is used for CommonError
    ($error_type:ty, $variant:ident) => {
        impl From<serde_json::Error> for $error_type {
            fn from(err: serde_json::Error) -> Self {
                Self::$variant($crate::error::CommonError::from(err))
            }
        }

        impl From<std::io::Error> for $error_type {
            fn from(err: std::io::Error) -> Self {
                Self::$variant($crate::error::CommonError::from(err))
            }
        }
    };

    // Variant that includes From<CommonError> (for cases without #[from])
    ($error_type:ty, $variant:ident, with_common) => {
        impl From<$crate::error::CommonError> for $error_type {
            fn from(err: $crate::error::CommonError) -> Self {
                Self::$variant(err)
            }
        }

        $crate::impl_error_conversion!($error_type, $variant);
    };
}

/// Macro to implement ErrorClassification by delegating to CommonError
///
/// ```rust,ignore
/// impl_error_classification!(MyError, Common,
///     Self::Specific(_) => {
///         retryable: false,
///         severity: ErrorSeverity::Error,
///         critical: false,
///     }
/// );
/// ```
#[macro_export]
macro_rules! impl_error_classification {
    (
        $error_type:ty,
        $common_variant:ident
        $(,
            $variant:pat => {
                retryable: $retryable:expr,
                severity: $severity:expr,
                critical: $critical:expr
                $(, retry_after: $retry_after:expr)?
                $(,)?
            }
        )*
        $(,)?
    ) => {
        impl $crate::error::ErrorClassification for $error_type {
            fn is_retryable(&self) -> bool {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::is_retryable(e),
                    $(
                        $variant => $retryable,
                    )*
                }
            }

            fn severity(&self) -> $crate::error::ErrorSeverity {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::severity(e),
                    $(
                        $variant => $severity,
                    )*
                }
            }

            fn is_critical(&self) -> bool {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::is_critical(e),
                    $(
                        $variant => $critical,
                    )*
                }
            }

            fn retry_after(&self) -> Option<std::time::Duration> {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::retry_after(e),
                    $(
                        $(
                            $variant => $retry_after,
                        )?
                    )*
                    #[allow(unreachable_patterns)]
                    _ => None,
                }
            }
        }
    };
}
