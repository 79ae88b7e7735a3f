// Lock-free lifecycle state for lazily created, once-only resources.
// The whole state (tag + payload) lives in a single AtomicU64 so that readers
// never observe a tag without its payload.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam::utils::Backoff;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::CommonError;

const TAG_MASK: u64 = 0b11;
const TAG_UNCREATED: u64 = 0;
const TAG_INITIALIZING: u64 = 1;
const TAG_CREATED: u64 = 2;
const TAG_SHUT_DOWN: u64 = 3;
const PAYLOAD_SHIFT: u32 = 32;

/// Lifecycle of a lazily created, once-only resource
///
/// `Initializing` is transient: it is held only while the single creation
/// winner runs its factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", content = "handle", rename_all = "snake_case")]
pub enum LifecycleState<T> {
    /// Nothing has been created yet (initial state, or after a test reset)
    Uncreated,
    /// A creator won the race and is building the resource
    Initializing,
    /// The resource exists and is identified by the payload
    Created(T),
    /// Terminal: the created resource was shut down
    ShutDown,
}

impl<T> LifecycleState<T> {
    /// Map the payload of a `Created` state
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> LifecycleState<U> {
        match self {
            Self::Uncreated => LifecycleState::Uncreated,
            Self::Initializing => LifecycleState::Initializing,
            Self::Created(value) => LifecycleState::Created(f(value)),
            Self::ShutDown => LifecycleState::ShutDown,
        }
    }

    /// The created payload, if any
    pub fn created(self) -> Option<T> {
        match self {
            Self::Created(value) => Some(value),
            _ => None,
        }
    }

    /// Whether the lifecycle reached its terminal state
    pub fn is_shut_down(&self) -> bool {
        matches!(self, Self::ShutDown)
    }

    /// Stable label for logs and error messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Uncreated => "uncreated",
            Self::Initializing => "initializing",
            Self::Created(_) => "created",
            Self::ShutDown => "shut_down",
        }
    }
}

impl<T: fmt::Display> fmt::Display for LifecycleState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created(value) => write!(f, "created({})", value),
            other => write!(f, "{}", other.label()),
        }
    }
}

/// Rejected lifecycle transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {operation} while lifecycle is {observed}")]
pub struct TransitionError {
    /// Transition that was attempted
    pub operation: &'static str,
    /// State found in the cell
    pub observed: LifecycleState<u32>,
}

impl From<TransitionError> for CommonError {
    fn from(err: TransitionError) -> Self {
        CommonError::invalid_state_in(err.observed.label(), err.to_string())
    }
}

fn encode(state: LifecycleState<u32>) -> u64 {
    match state {
        LifecycleState::Uncreated => TAG_UNCREATED,
        LifecycleState::Initializing => TAG_INITIALIZING,
        LifecycleState::Created(payload) => (u64::from(payload) << PAYLOAD_SHIFT) | TAG_CREATED,
        LifecycleState::ShutDown => TAG_SHUT_DOWN,
    }
}

fn decode(word: u64) -> LifecycleState<u32> {
    match word & TAG_MASK {
        TAG_UNCREATED => LifecycleState::Uncreated,
        TAG_INITIALIZING => LifecycleState::Initializing,
        TAG_CREATED => LifecycleState::Created((word >> PAYLOAD_SHIFT) as u32),
        _ => LifecycleState::ShutDown,
    }
}

/// Atomic cell driving `Uncreated -> Initializing -> Created -> ShutDown`
///
/// Exactly one caller can move the cell out of `Uncreated`
/// ([`try_begin`](Self::try_begin)); everybody else waits in
/// [`wait_while_initializing`](Self::wait_while_initializing) until the
/// winner either [`publish`](Self::publish)es a payload or
/// [`abort`](Self::abort)s. The payload is published with `Release` and read
/// with `Acquire`, so anything the winner wrote before publishing is visible
/// to every thread that observes `Created`.
#[derive(Debug)]
pub struct LifecycleCell {
    word: AtomicU64,
}

impl Default for LifecycleCell {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleCell {
    /// Create a cell in the `Uncreated` state
    pub const fn new() -> Self {
        Self { word: AtomicU64::new(TAG_UNCREATED) }
    }

    /// Snapshot of the current state
    pub fn load(&self) -> LifecycleState<u32> {
        decode(self.word.load(Ordering::Acquire))
    }

    /// Try to become the single creator
    ///
    /// Succeeds only on `Uncreated -> Initializing`. On failure the observed
    /// state is returned.
    pub fn try_begin(&self) -> Result<(), LifecycleState<u32>> {
        self.word
            .compare_exchange(TAG_UNCREATED, TAG_INITIALIZING, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(decode)
    }

    /// Publish the created payload (`Initializing -> Created`)
    pub fn publish(&self, payload: u32) -> Result<(), TransitionError> {
        self.transition_from_initializing("publish", LifecycleState::Created(payload))
    }

    /// Roll a failed creation back (`Initializing -> Uncreated`)
    pub fn abort(&self) -> Result<(), TransitionError> {
        self.transition_from_initializing("abort", LifecycleState::Uncreated)
    }

    fn transition_from_initializing(
        &self,
        operation: &'static str,
        next: LifecycleState<u32>,
    ) -> Result<(), TransitionError> {
        self.word
            .compare_exchange(TAG_INITIALIZING, encode(next), Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|word| TransitionError { operation, observed: decode(word) })
    }

    /// Wait until no creation is in flight and return the settled state
    ///
    /// Spins, then yields. The wait is bounded by the creator's factory.
    pub fn wait_while_initializing(&self) -> LifecycleState<u32> {
        let backoff = Backoff::new();
        loop {
            let state = self.load();
            if state != LifecycleState::Initializing {
                return state;
            }
            backoff.snooze();
        }
    }

    /// Move a created cell to `ShutDown` and return the state it left
    ///
    /// An in-flight creation is waited out first. Only `Created` is sealed:
    /// an `Uncreated` or already `ShutDown` cell is returned as observed and
    /// left unchanged.
    pub fn seal(&self) -> LifecycleState<u32> {
        loop {
            let current = self.wait_while_initializing();
            let LifecycleState::Created(_) = current else {
                return current;
            };
            if self
                .word
                .compare_exchange(
                    encode(current),
                    TAG_SHUT_DOWN,
                    Ordering::AcqRel,
                    Ordering::Acquire,
                )
                .is_ok()
            {
                tracing::trace!(previous = %current, "lifecycle sealed");
                return current;
            }
        }
    }

    /// Force the cell back to `Uncreated`
    ///
    /// Only valid while no other operation is in flight on the cell.
    pub fn reset(&self) {
        tracing::trace!(previous = %self.load(), "lifecycle reset");
        self.word.store(TAG_UNCREATED, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for the lifecycle cell
    //!
    //! Tests cover the encoding round trip of every state, the single-winner
    //! begin transition, rollback, sealing, and concurrent waiters.

    use std::sync::atomic::AtomicUsize;
    use std::sync::{Arc, Barrier};
    use std::thread;

    use super::*;

    /// Validates every state survives the packed representation.
    #[test]
    fn test_encode_decode_all_states() {
        for state in [
            LifecycleState::Uncreated,
            LifecycleState::Initializing,
            LifecycleState::Created(0),
            LifecycleState::Created(42),
            LifecycleState::Created(u32::MAX),
            LifecycleState::ShutDown,
        ] {
            assert_eq!(decode(encode(state)), state);
        }
    }

    /// Validates `LifecycleCell::new` starts uncreated.
    #[test]
    fn test_cell_starts_uncreated() {
        let cell = LifecycleCell::new();
        assert_eq!(cell.load(), LifecycleState::Uncreated);
    }

    /// Validates the begin/publish happy path.
    ///
    /// Assertions:
    /// - Confirms a second `try_begin` reports `Initializing`.
    /// - Confirms the published payload is visible.
    #[test]
    fn test_begin_then_publish() {
        let cell = LifecycleCell::new();

        assert!(cell.try_begin().is_ok());
        assert_eq!(cell.try_begin(), Err(LifecycleState::Initializing));

        cell.publish(42).unwrap();
        assert_eq!(cell.load(), LifecycleState::Created(42));
        assert_eq!(cell.try_begin(), Err(LifecycleState::Created(42)));
    }

    /// Validates `abort` returns the cell to `Uncreated` so creation can be
    /// retried.
    #[test]
    fn test_abort_rolls_back() {
        let cell = LifecycleCell::new();
        cell.try_begin().unwrap();
        cell.abort().unwrap();

        assert_eq!(cell.load(), LifecycleState::Uncreated);
        assert!(cell.try_begin().is_ok());
    }

    /// Validates `publish` refuses to run outside `Initializing`.
    #[test]
    fn test_publish_without_begin_is_rejected() {
        let cell = LifecycleCell::new();
        let err = cell.publish(7).unwrap_err();

        assert_eq!(err.operation, "publish");
        assert_eq!(err.observed, LifecycleState::Uncreated);
        assert_eq!(err.to_string(), "cannot publish while lifecycle is uncreated");
    }

    /// Validates sealing from each settled state.
    ///
    /// Assertions:
    /// - Confirms an uncreated cell is left uncreated and can still begin.
    /// - Confirms a created cell ends `ShutDown` and refuses to begin.
    #[test]
    fn test_seal_transitions() {
        let cell = LifecycleCell::new();
        assert_eq!(cell.seal(), LifecycleState::Uncreated);
        assert_eq!(cell.load(), LifecycleState::Uncreated);
        assert!(cell.try_begin().is_ok());

        let cell = LifecycleCell::new();
        cell.try_begin().unwrap();
        cell.publish(9).unwrap();
        assert_eq!(cell.seal(), LifecycleState::Created(9));
        assert_eq!(cell.load(), LifecycleState::ShutDown);
        assert_eq!(cell.seal(), LifecycleState::ShutDown);
        assert_eq!(cell.try_begin(), Err(LifecycleState::ShutDown));
    }

    /// Validates `reset` returns a sealed cell to `Uncreated`.
    #[test]
    fn test_reset_after_seal() {
        let cell = LifecycleCell::new();
        cell.try_begin().unwrap();
        cell.publish(4).unwrap();
        cell.seal();
        cell.reset();
        assert_eq!(cell.load(), LifecycleState::Uncreated);
    }

    /// Validates waiters block until the winner publishes.
    ///
    /// Assertions:
    /// - Every waiter observes `Created(5)`.
    #[test]
    fn test_waiters_observe_published_payload() {
        let cell = Arc::new(LifecycleCell::new());
        cell.try_begin().unwrap();

        let barrier = Arc::new(Barrier::new(5));
        let observed = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cell = Arc::clone(&cell);
                let barrier = Arc::clone(&barrier);
                let observed = Arc::clone(&observed);
                thread::spawn(move || {
                    barrier.wait();
                    if cell.wait_while_initializing() == LifecycleState::Created(5) {
                        observed.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        barrier.wait();
        thread::sleep(std::time::Duration::from_millis(20));
        cell.publish(5).unwrap();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(observed.load(Ordering::SeqCst), 4);
    }

    /// Validates the serialized form used in diagnostics.
    #[test]
    fn test_state_serialization() {
        let json = serde_json::to_string(&LifecycleState::Created(42u32)).unwrap();
        assert_eq!(json, r#"{"state":"created","handle":42}"#);

        let back: LifecycleState<u32> = serde_json::from_str(r#"{"state":"shut_down"}"#).unwrap();
        assert_eq!(back, LifecycleState::ShutDown);
    }

    /// Validates display and conversion into `CommonError`.
    #[test]
    fn test_transition_error_into_common() {
        let err = TransitionError { operation: "abort", observed: LifecycleState::Created(3) };
        let common: CommonError = err.into();
        assert_eq!(
            common.to_string(),
            "Invalid state 'created': cannot abort while lifecycle is created(3)"
        );
    }
}
