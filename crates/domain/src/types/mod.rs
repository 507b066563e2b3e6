//! Domain types and models

pub mod telemetry;
pub mod vehicle;

pub use telemetry::{BulkTelemetry, ChargeStatus, ChargingIndicator};
pub use vehicle::{Scope, Vehicle, VehicleList};
