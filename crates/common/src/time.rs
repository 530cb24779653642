//! Wall-clock abstraction for token expiry
//!
//! Token expiry is stored as absolute epoch milliseconds, so the session only
//! needs "now" on the wall clock. Tests substitute
//! `testing::MockClock` to move time forward deterministically.
//!
//! # Examples
//!
//! ```
//! use encore_common::time::{Clock, SystemClock};
//!
//! let clock = SystemClock;
//! assert!(clock.millis_since_epoch() > 0);
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current wall-clock time
pub trait Clock: Send + Sync {
    /// Get current system time (wall clock)
    fn system_time(&self) -> SystemTime;

    /// Get milliseconds since UNIX epoch
    fn millis_since_epoch(&self) -> i64 {
        self.system_time()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or_default()
    }
}

/// Real system clock implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn system_time(&self) -> SystemTime {
        SystemTime::now()
    }
}
