//! # fleetlink Domain
//!
//! Business domain types and models for fleetlink.
//!
//! This crate contains:
//! - Vehicle records, scopes and telemetry snapshots
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other fleetlink crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
