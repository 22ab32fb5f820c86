use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Reject,
}

/// Process-wide gate for biased grid requests.
///
/// A single timestamp is shared by every caller: one client can starve the
/// others. Unbiased requests never go through this gate.
#[derive(Debug)]
pub struct BiasRateLimiter {
    window: Duration,
    last_accepted: Mutex<Option<Instant>>,
}

impl BiasRateLimiter {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_accepted: Mutex::new(None),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Allows and records `now` if the window has elapsed since the last
    /// accepted request. A rejection leaves the state untouched.
    pub fn check_and_record(&self, now: Instant) -> Decision {
        // The critical section never panics, so a poisoned lock still holds a
        // consistent timestamp.
        let mut last = self
            .last_accepted
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        match *last {
            Some(previous) if now.saturating_duration_since(previous) < self.window => {
                Decision::Reject
            }
            _ => {
                *last = Some(now);
                Decision::Allow
            }
        }
    }
}
