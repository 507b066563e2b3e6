//! # fleetlink Infrastructure
//!
//! Infrastructure implementations of the core vehicle ports.
//!
//! This crate contains:
//! - HTTP client with retry and timeout support
//! - Authorized API client that renews rejected bearer tokens once
//! - The fleet API adapter (vehicle list, bulk telemetry, charge actions)
//! - Configuration loading from environment variables and files
//! - Logging setup
//!
//! ## Architecture
//! - Implements traits defined in `fleetlink-core`
//! - Depends on `fleetlink-common`, `fleetlink-domain` and `fleetlink-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod api;
pub mod config;
pub mod errors;
pub mod factory;
pub mod fleet;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use errors::InfraError;
pub use factory::VehicleFactory;
pub use fleet::FleetApi;
pub use http::{HttpClient, HttpClientBuilder};
pub use observability::{init as init_logging, LogFormat};
