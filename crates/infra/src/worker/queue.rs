//! Pending cleanup queue
//!
//! FIFO of boxed actions shared between producers and the one worker thread
//! that consumes it. After a stop request the queue accepts nothing new;
//! the consumer sees the remaining actions (drain) or none (discard), then
//! `None`.

use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex};

/// A deferred cleanup action
pub type CleanupAction = Box<dyn FnOnce() + Send + 'static>;

#[derive(Default)]
struct QueueState {
    actions: VecDeque<CleanupAction>,
    stopping: bool,
}

/// FIFO of cleanup actions owned by a worker
#[derive(Default)]
pub struct PendingCleanupQueue {
    state: Mutex<QueueState>,
    ready: Condvar,
}

impl std::fmt::Debug for PendingCleanupQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("PendingCleanupQueue")
            .field("len", &state.actions.len())
            .field("stopping", &state.stopping)
            .finish()
    }
}

impl PendingCleanupQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action
    ///
    /// # Errors
    /// Hands the action back once a stop has been requested.
    pub fn push(&self, action: CleanupAction) -> Result<(), CleanupAction> {
        let mut state = self.state.lock();
        if state.stopping {
            return Err(action);
        }
        state.actions.push_back(action);
        drop(state);
        self.ready.notify_one();
        Ok(())
    }

    /// Block until an action is available
    ///
    /// Returns `None` once a stop was requested and nothing is left to run.
    pub fn next(&self) -> Option<CleanupAction> {
        let mut state = self.state.lock();
        loop {
            if let Some(action) = state.actions.pop_front() {
                return Some(action);
            }
            if state.stopping {
                return None;
            }
            self.ready.wait(&mut state);
        }
    }

    /// Stop accepting actions and wake the consumer
    ///
    /// With `drain` false, queued actions are dropped unexecuted and their
    /// count is returned. Dropping happens outside the lock.
    pub fn request_stop(&self, drain: bool) -> usize {
        let discarded = {
            let mut state = self.state.lock();
            state.stopping = true;
            if drain {
                VecDeque::new()
            } else {
                std::mem::take(&mut state.actions)
            }
        };
        self.ready.notify_all();
        discarded.len()
    }

    /// Number of queued actions
    pub fn len(&self) -> usize {
        self.state.lock().actions.len()
    }

    /// Whether no action is queued
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a stop has been requested
    pub fn is_stopping(&self) -> bool {
        self.state.lock().stopping
    }
}
