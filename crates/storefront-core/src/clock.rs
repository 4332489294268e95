//! Wall-clock time for receipts and stored snapshots.

use chrono::{DateTime, Utc};

/// Source of the timestamps the storefront records: when an order was placed
/// and when a cart snapshot was last written.
///
/// Injected so tests can pin those timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the host's UTC time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
