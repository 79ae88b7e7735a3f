//! Per-thread execution context
//!
//! Every thread starts `Runnable`. Code about to block (such as the first
//! request for the cleaner worker, which may spawn a thread) must switch to
//! `Native` for the duration with a [`ThreadStateGuard`].

use std::cell::Cell;
use std::marker::PhantomData;

use finalizer_domain::ThreadState;

thread_local! {
    static THREAD_STATE: Cell<ThreadState> = const { Cell::new(ThreadState::Runnable) };
}

/// Execution state of the calling thread
pub fn current_thread_state() -> ThreadState {
    THREAD_STATE.with(Cell::get)
}

/// Debug-assert the calling thread is in `expected`
///
/// A mismatch is a programming error in the caller and is not recoverable.
#[track_caller]
pub fn assert_thread_state(expected: ThreadState) {
    debug_assert_eq!(
        current_thread_state(),
        expected,
        "calling thread must be in the {expected} state"
    );
}

/// Scope guard that switches the calling thread's state
///
/// The previous state is restored on drop. The guard is tied to the thread
/// that created it.
#[derive(Debug)]
#[must_use = "the previous state is restored as soon as the guard is dropped"]
pub struct ThreadStateGuard {
    previous: ThreadState,
    _not_send: PhantomData<*const ()>,
}

impl ThreadStateGuard {
    /// Switch the calling thread to `state`
    pub fn new(state: ThreadState) -> Self {
        let previous = THREAD_STATE.with(|cell| cell.replace(state));
        Self { previous, _not_send: PhantomData }
    }

    /// Shorthand for `ThreadStateGuard::new(ThreadState::Native)`
    pub fn native() -> Self {
        Self::new(ThreadState::Native)
    }
}

impl Drop for ThreadStateGuard {
    fn drop(&mut self) {
        THREAD_STATE.with(|cell| cell.set(self.previous));
    }
}
