//! Start-gated multi-thread harness
//!
//! Every thread is spawned and parked on a shared gate before any of them
//! runs the closure, which maximises contention on whatever the closure
//! touches first.

// Allow missing panic docs for test utilities - a panicking thread is
// re-raised on the caller, which is the point in a test
#![allow(clippy::missing_panics_doc)]

use std::panic;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam::utils::Backoff;

/// Thread count used by contention tests
#[cfg(windows)]
pub const DEFAULT_THREAD_COUNT: usize = 10;

/// Thread count used by contention tests
#[cfg(not(windows))]
pub const DEFAULT_THREAD_COUNT: usize = 100;

/// Run `f` on `threads` threads released at the same instant
///
/// The closure receives the thread index. Results are returned in index
/// order. A panic on any thread is propagated to the caller.
///
/// # Examples
///
/// ```
/// use finalizer_common::testing::concurrency::run_concurrently;
///
/// let values = run_concurrently(8, |index| index * 2);
/// assert_eq!(values, vec![0, 2, 4, 6, 8, 10, 12, 14]);
/// ```
pub fn run_concurrently<R, F>(threads: usize, f: F) -> Vec<R>
where
    F: Fn(usize) -> R + Send + Sync + 'static,
    R: Send + 'static,
{
    let f = Arc::new(f);
    let started = Arc::new(AtomicUsize::new(0));
    let allow_running = Arc::new(AtomicBool::new(false));

    let handles: Vec<_> = (0..threads)
        .map(|index| {
            let f = Arc::clone(&f);
            let started = Arc::clone(&started);
            let allow_running = Arc::clone(&allow_running);
            thread::spawn(move || {
                started.fetch_add(1, Ordering::SeqCst);
                let backoff = Backoff::new();
                while !allow_running.load(Ordering::SeqCst) {
                    backoff.snooze();
                }
                f(index)
            })
        })
        .collect();

    let backoff = Backoff::new();
    while started.load(Ordering::SeqCst) != threads {
        backoff.snooze();
    }
    allow_running.store(true, Ordering::SeqCst);

    handles
        .into_iter()
        .map(|handle| match handle.join() {
            Ok(value) => value,
            Err(payload) => panic::resume_unwind(payload),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicU64;

    use super::*;

    /// Validates results come back in thread index order.
    #[test]
    fn test_results_in_index_order() {
        let values = run_concurrently(16, |index| index);
        assert_eq!(values, (0..16).collect::<Vec<_>>());
    }

    /// Validates every thread runs the closure exactly once.
    #[test]
    fn test_every_thread_runs() {
        let counter = Arc::new(AtomicU64::new(0));
        let shared = Arc::clone(&counter);

        run_concurrently(DEFAULT_THREAD_COUNT, move |_| {
            shared.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(counter.load(Ordering::SeqCst), DEFAULT_THREAD_COUNT as u64);
    }

    /// Validates a panicking thread surfaces on the caller.
    #[test]
    #[should_panic(expected = "boom")]
    fn test_panic_is_propagated() {
        run_concurrently(2, |index| {
            if index == 1 {
                panic!("boom");
            }
        });
    }
}
