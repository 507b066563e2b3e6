//! # fleetlink Core
//!
//! Vehicle logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for the fleet provider
//! - VIN resolution against the account's vehicle list
//! - Scope-driven capability composition of vehicle handles
//! - The cached telemetry reader shared by every handle accessor
//!
//! ## Architecture Principles
//! - Only depends on `fleetlink-common` and `fleetlink-domain`
//! - No HTTP or platform code
//! - All external dependencies via traits

pub mod vehicle;

pub use vehicle::capabilities::Capabilities;
pub use vehicle::catalog::{select_vehicle, FleetCatalog};
pub use vehicle::handle::{
    ChargeControlFacet, ChargeStateFacet, OdometerFacet, VehicleHandle, VehicleSettings,
};
pub use vehicle::ports::{ChargeActions, FleetDirectory, TelemetrySource};
pub use vehicle::service::VehicleConnector;
pub use vehicle::telemetry::CachedTelemetry;
