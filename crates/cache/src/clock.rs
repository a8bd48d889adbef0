//! Time source for expiry checks.

use std::cell::Cell;
use std::rc::Rc;

/// Supplies the current time in epoch milliseconds.
pub trait Clock {
    /// Current epoch milliseconds.
    fn now(&self) -> i64;

    /// Whether `timestamp` lies strictly in the past.
    ///
    /// A timestamp equal to [`Clock::now`] is not yet expired.
    fn is_expired(&self, timestamp: i64) -> bool {
        self.now() > timestamp
    }
}

/// Wall clock backed by `chrono::Utc`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same instant, so a handle kept outside a cache can move
/// the time the cache observes.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<i64>>,
}

impl ManualClock {
    #[must_use]
    pub fn new(now: i64) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    /// Jump to an absolute instant.
    pub fn set(&self, now: i64) {
        self.now.set(now);
    }

    /// Move forward by `millis`.
    pub fn advance(&self, millis: i64) {
        self.now.set(self.now.get().saturating_add(millis));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.now.get()
    }
}
