//! Testing utilities and helpers
//!
//! Scripted stand-ins for the session manager's injected capabilities:
//! - **[`mocks`]**: [`MockOAuthClient`] (scripted, call-counting, optionally
//!   gated) and [`FixedCrypto`]
//! - **[`time`]**: [`MockClock`] for deterministic expiry
//!
//! ## Usage
//!
//! ```rust
//! use encore_common::testing::{MockClock, MockOAuthClient};
//! use encore_common::time::Clock;
//!
//! let clock = MockClock::at(1_000);
//! clock.advance_millis(500);
//! assert_eq!(clock.millis_since_epoch(), 1_500);
//!
//! let client = MockOAuthClient::new();
//! client.push_refresh_ok("A2", None, 3600);
//! assert_eq!(client.refresh_calls(), 0);
//! ```

pub mod mocks;
pub mod time;

pub use mocks::{FixedCrypto, MockOAuthClient};
pub use time::MockClock;
