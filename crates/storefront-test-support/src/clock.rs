//! Test clocks: pinned and advancing `Clock` implementations.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use storefront_core::clock::Clock;

/// Reports the same instant on every call, e.g. to assert a receipt's
/// `placed_at`.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Starts at a given instant and moves forward by `step` after every
/// reading, so successive snapshot writes get distinct timestamps.
#[derive(Debug)]
pub struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl SteppingClock {
    #[must_use]
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            next: Mutex::new(start),
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().unwrap();
        let now = *next;
        *next = now + self.step;
        now
    }
}
