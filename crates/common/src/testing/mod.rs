//! Testing utilities and helpers
//!
//! - **[`mocks`]**: Mock implementations of common traits (platform tier)
//! - `MockClock`: re-exported from [`crate::time`]
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//!
//! use fleetlink_common::testing::MockClock;
//!
//! let clock = MockClock::new();
//! clock.advance(Duration::from_secs(5));
//! assert_eq!(clock.elapsed(), Duration::from_secs(5));
//! ```

#[cfg(feature = "platform")]
pub mod mocks;

#[cfg(feature = "platform")]
pub use mocks::MockAuthenticator;

pub use crate::time::{Clock, MockClock, SystemClock};
