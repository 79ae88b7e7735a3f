//! Integration tests for `finalizer_common::error`.
//!
//! These suites validate classification, logging payloads, and module error
//! delegation so downstream crates receive consistent failure semantics.

use std::time::Duration;

use finalizer_common::error::{CommonError, CommonResult, ErrorClassification, ErrorSeverity};
use finalizer_common::{impl_error_classification, impl_error_conversion};
use thiserror::Error;

/// Validates `CommonError` behavior for the classification matrix matches
/// expected contract scenario.
///
/// Assertions:
/// - Confirms `err.is_retryable()` equals `retryable`.
/// - Confirms `err.severity()` equals `severity`.
/// - Confirms `err.is_critical()` equals `critical`.
#[test]
fn classification_matrix_matches_expected_contract() {
    let cases = vec![
        (CommonError::io_op("spawn", "resource unavailable"), false, ErrorSeverity::Error, false),
        (CommonError::serialization_format("JSON", "eof"), false, ErrorSeverity::Error, false),
        (CommonError::invalid_state("already shut down"), false, ErrorSeverity::Error, false),
        (
            CommonError::internal_with_context("slot corrupted", "lifecycle"),
            false,
            ErrorSeverity::Critical,
            true,
        ),
    ];

    for (err, retryable, severity, critical) in cases {
        assert_eq!(err.is_retryable(), retryable, "retryable mismatch for {err}");
        assert_eq!(err.severity(), severity, "severity mismatch for {err}");
        assert_eq!(err.is_critical(), critical, "critical mismatch for {err}");
        assert_eq!(err.retry_after(), None);
    }
}

/// Validates `CommonError::as_tracing_fields` behavior for the invalid state
/// scenario.
///
/// Assertions:
/// - Confirms the first field is the error type name.
/// - Confirms the state and message fields are present.
#[test]
fn tracing_fields_carry_state_context() {
    let err = CommonError::invalid_state_in("shut_down", "cannot create worker");
    let fields = err.as_tracing_fields();

    assert_eq!(fields[0], ("error_type", "invalid_state".to_string()));
    assert!(fields.contains(&("state", "shut_down".to_string())));
    assert!(fields.contains(&("message", "cannot create worker".to_string())));
}

#[derive(Debug, Error)]
enum ModuleError {
    #[error("worker {0} is gone")]
    Gone(u32),

    #[error("worker {0} is busy")]
    Busy(u32),

    #[error(transparent)]
    Common(#[from] CommonError),
}

impl_error_conversion!(ModuleError, Common);
impl_error_classification!(ModuleError, Common,
    Self::Gone(_) => {
        retryable: false,
        severity: ErrorSeverity::Info,
        critical: false,
    },
    Self::Busy(_) => {
        retryable: true,
        severity: ErrorSeverity::Warning,
        critical: false,
        retry_after: Some(Duration::from_millis(5)),
    }
);

fn read_missing() -> Result<String, ModuleError> {
    Ok(std::fs::read_to_string("/definitely/not/a/finalizer/config.toml")?)
}

/// Validates `impl_error_classification!` behavior for the module error
/// delegation scenario.
///
/// Assertions:
/// - Confirms module variants use their declared classification and retry
///   delay.
/// - Confirms common variants delegate to `CommonError`.
/// - Confirms `io::Error` routes through the common variant.
#[test]
fn module_errors_delegate_to_common() {
    let gone = ModuleError::Gone(3);
    assert!(!gone.is_retryable());
    assert_eq!(gone.severity(), ErrorSeverity::Info);

    let busy = ModuleError::Busy(4);
    assert!(busy.is_retryable());
    assert_eq!(busy.retry_after(), Some(Duration::from_millis(5)));
    assert_eq!(gone.retry_after(), None);

    let internal: ModuleError = CommonError::internal_with_context("bad id", "cell").into();
    assert!(internal.is_critical());
    assert_eq!(internal.severity(), ErrorSeverity::Critical);

    let io = read_missing().expect_err("file does not exist");
    assert!(matches!(io, ModuleError::Common(CommonError::Io { .. })));
}

/// Validates `CommonResult` behavior for the `?` propagation scenario.
///
/// Assertions:
/// - Confirms JSON errors convert through `?`.
#[test]
fn common_result_propagates_json_errors() {
    fn parse(input: &str) -> CommonResult<serde_json::Value> {
        Ok(serde_json::from_str(input)?)
    }

    let err = parse("{not json").expect_err("invalid JSON");
    assert_eq!(err.error_type_name(), "serialization");
}
