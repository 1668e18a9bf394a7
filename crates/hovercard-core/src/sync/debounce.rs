//! Trailing-edge search debounce
//!
//! One cancellable deadline: re-arming replaces any pending commit, so only
//! the last input inside the window ever fires. Time is passed in explicitly
//! so the behavior is deterministic under test.

use std::time::{Duration, Instant};

/// Pending commit of a search term
#[derive(Debug, Clone)]
struct Pending {
    fire_at: Instant,
    input: String,
}

/// Trailing-edge debounce for the deck search term
#[derive(Debug)]
pub struct SearchDebounce {
    window: Duration,
    pending: Option<Pending>,
}

impl SearchDebounce {
    /// Create a debounce with the given window
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Re-arm with new input. Any pending commit is replaced; the deadline
    /// restarts from `now`.
    pub fn arm(&mut self, input: &str, now: Instant) {
        self.pending = Some(Pending {
            fire_at: now + self.window,
            input: input.to_string(),
        });
    }

    /// Commit the pending term if its deadline has passed. Returns the
    /// lowercase-normalized term at most once per arm.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some(pending) if now >= pending.fire_at => {
                let term = pending.input.to_lowercase();
                self.pending = None;
                Some(term)
            }
            _ => None,
        }
    }

    /// Drop any pending commit
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Whether a commit is pending
    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }
}
