//! Mock building blocks for port implementations
//!
//! [`MockFn`] records every invocation and answers from a script of return
//! values, which is enough to express "expect exactly one call returning 42"
//! style expectations without a mocking framework.

// Allow missing panic docs for test mocks - they are designed to be simple
#![allow(clippy::missing_panics_doc)]

use std::collections::VecDeque;

use parking_lot::Mutex;

/// Recording, scripted stand-in for a single function
///
/// # Examples
///
/// ```
/// use finalizer_common::testing::mocks::MockFn;
///
/// let create = MockFn::<(), u32>::new().returning_once(42);
///
/// assert_eq!(create.call(()), Some(42));
/// assert_eq!(create.call(()), None);
/// assert_eq!(create.call_count(), 2);
/// ```
#[derive(Debug)]
pub struct MockFn<A, R> {
    calls: Mutex<Vec<A>>,
    script: Mutex<VecDeque<R>>,
    fallback: Mutex<Option<R>>,
}

impl<A, R> Default for MockFn<A, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, R> MockFn<A, R> {
    /// Create a mock with no scripted answers
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            script: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(None),
        }
    }

    /// Answer the next unanswered call with `value`
    #[must_use]
    pub fn returning_once(self, value: R) -> Self {
        self.script.lock().push_back(value);
        self
    }

    /// Queue another scripted answer on an existing mock
    pub fn push_return(&self, value: R) {
        self.script.lock().push_back(value);
    }

    /// Number of recorded invocations
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Forget recorded invocations (scripted answers are kept)
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }
}

impl<A, R: Clone> MockFn<A, R> {
    /// Answer every call not covered by the script with `value`
    #[must_use]
    pub fn returning(self, value: R) -> Self {
        *self.fallback.lock() = Some(value);
        self
    }

    /// Record an invocation and produce its scripted answer
    ///
    /// Returns `None` when neither the script nor a fallback covers the call.
    pub fn call(&self, args: A) -> Option<R> {
        self.calls.lock().push(args);
        let scripted = self.script.lock().pop_front();
        scripted.or_else(|| self.fallback.lock().clone())
    }
}

impl<A: Clone, R> MockFn<A, R> {
    /// Arguments of every recorded invocation, in call order
    pub fn calls(&self) -> Vec<A> {
        self.calls.lock().clone()
    }

    /// Arguments of the most recent invocation
    pub fn last_call(&self) -> Option<A> {
        self.calls.lock().last().cloned()
    }
}
