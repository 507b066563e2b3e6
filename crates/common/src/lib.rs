//! Modular common utilities shared across fleetlink crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: error and serialization dependencies only
//! - `runtime`: async infrastructure (single-flight cache, clock)
//! - `platform`: token lifecycle and the OAuth token endpoint client
//! - `observability`: tracing (pulled in by `runtime`)
//! - `test-utils`: mock clock and mock authenticator for downstream tests

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod cache;
#[cfg(feature = "runtime")]
pub mod time;

// Platform tier
// -------------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod auth;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(feature = "test-utils")]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "runtime")]
pub use cache::{CacheStats, SingleFlightCache};
#[cfg(feature = "runtime")]
pub use time::{Clock, MockClock, SystemClock};
