//! Custom assertions for testing
//!
//! Provides assertion macros and functions for common testing scenarios.

// Allow missing panics docs for test utilities - these assertions are designed to panic
// on failure which is their core purpose in test contexts
#![allow(clippy::missing_panics_doc)]

use std::fmt::Debug;

/// Assert that an error contains a specific substring
///
/// # Examples
///
/// ```
/// let result: Result<(), String> = Err("cleaner worker has been shut down".to_string());
/// finalizer_common::assert_error_contains!(result, "shut down");
/// ```
#[macro_export]
macro_rules! assert_error_contains {
    ($result:expr, $substring:expr) => {
        match &$result {
            Ok(_) => panic!("Expected error but got Ok"),
            Err(e) => {
                let error_msg = format!("{}", e);
                assert!(
                    error_msg.contains($substring),
                    "Error message '{}' does not contain '{}'",
                    error_msg,
                    $substring
                );
            }
        }
    };
}

/// Assert that a condition eventually becomes true within a timeout
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let flag = Arc::new(AtomicBool::new(false));
/// let flag_clone = Arc::clone(&flag);
///
/// std::thread::spawn(move || {
///     std::thread::sleep(Duration::from_millis(20));
///     flag_clone.store(true, Ordering::SeqCst);
/// });
///
/// finalizer_common::assert_eventually!(Duration::from_secs(1), flag.load(Ordering::SeqCst));
/// ```
#[macro_export]
macro_rules! assert_eventually {
    ($timeout:expr, $condition:expr) => {{
        let start = std::time::Instant::now();
        let timeout = $timeout;
        let mut last_value = false;

        while start.elapsed() < timeout {
            last_value = $condition;
            if last_value {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }

        assert!(last_value, "Condition did not become true within {:?}", timeout);
    }};
}

/// Assert that every element of `values` equals `expected`
///
/// # Examples
///
/// ```
/// use finalizer_common::testing::assertions::assert_all_equal;
///
/// assert_all_equal(&[42, 42, 42], &42);
/// ```
pub fn assert_all_equal<T>(values: &[T], expected: &T)
where
    T: PartialEq + Debug,
{
    if let Some((index, value)) = values.iter().enumerate().find(|(_, value)| *value != expected)
    {
        panic!(
            "Element {} of {} is {:?}, expected every element to be {:?}",
            index,
            values.len(),
            value,
            expected
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates `assert_all_equal` accepts a uniform slice.
    #[test]
    fn test_assert_all_equal_uniform() {
        assert_all_equal(&[7u32; 10], &7);
        assert_all_equal::<u32>(&[], &7);
    }

    /// Validates `assert_all_equal` reports the first mismatch.
    #[test]
    #[should_panic(expected = "Element 2 of 3 is 9")]
    fn test_assert_all_equal_mismatch() {
        assert_all_equal(&[1, 1, 9], &1);
    }

    /// Validates `assert_error_contains!` on an error value.
    #[test]
    fn test_assert_error_contains() {
        let result: Result<(), String> = Err("worker 3 not found".to_string());
        assert_error_contains!(result, "not found");
    }
}
