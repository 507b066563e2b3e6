//! Shared test helpers for `fleetlink-core` integration tests.
//!
//! Provides an in-memory fleet provider so handle tests can focus on
//! behaviour instead of HTTP plumbing.

pub mod fleet;
