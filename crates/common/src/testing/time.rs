//! Time mocking utilities

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::time::Clock;

/// Mock wall clock for deterministic expiry tests
///
/// Clones share the same time, so a clock handed to a session can still be
/// advanced by the test.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use encore_common::testing::MockClock;
/// use encore_common::time::Clock;
///
/// let clock = MockClock::at(0);
/// clock.advance(Duration::from_secs(5));
/// assert_eq!(clock.millis_since_epoch(), 5_000);
/// ```
#[derive(Debug, Clone)]
pub struct MockClock {
    millis: Arc<AtomicI64>,
}

impl MockClock {
    /// Create a clock frozen at the current real time
    pub fn new() -> Self {
        Self::at(crate::time::SystemClock.millis_since_epoch())
    }

    /// Create a clock frozen at `millis` since the UNIX epoch
    pub fn at(millis: i64) -> Self {
        Self { millis: Arc::new(AtomicI64::new(millis)) }
    }

    /// Advance the mock clock by a duration
    pub fn advance(&self, duration: Duration) {
        self.advance_millis(i64::try_from(duration.as_millis()).unwrap_or(i64::MAX));
    }

    pub fn advance_millis(&self, millis: i64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }

    /// Set the clock to an absolute time
    pub fn set_millis(&self, millis: i64) {
        self.millis.store(millis, Ordering::SeqCst);
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn system_time(&self) -> SystemTime {
        let millis = u64::try_from(self.millis.load(Ordering::SeqCst)).unwrap_or_default();
        UNIX_EPOCH + Duration::from_millis(millis)
    }

    fn millis_since_epoch(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for testing::time.
    use super::*;

    #[test]
    fn test_clones_share_time() {
        let clock = MockClock::at(10);
        let handle = clock.clone();

        handle.advance(Duration::from_millis(5));
        assert_eq!(clock.millis_since_epoch(), 15);

        clock.set_millis(0);
        assert_eq!(handle.system_time(), UNIX_EPOCH);
    }
}
