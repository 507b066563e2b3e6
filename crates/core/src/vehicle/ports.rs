//! Port interfaces for the fleet provider
//!
//! These traits define the boundaries between vehicle logic and the HTTP
//! adapter in `fleetlink-infra`.

use async_trait::async_trait;
use fleetlink_domain::{BulkTelemetry, Result, Vehicle};

/// Lists the vehicles visible to the authenticated account
#[async_trait]
pub trait FleetDirectory: Send + Sync {
    async fn vehicles(&self) -> Result<Vec<Vehicle>>;
}

/// Reads the bulk telemetry snapshot of one vehicle
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Fetch a complete snapshot; failures map to `FleetError::Fetch`
    async fn bulk(&self, vehicle_id: &str) -> Result<BulkTelemetry>;
}

/// Remote charge control
#[async_trait]
pub trait ChargeActions: Send + Sync {
    /// Ask the vehicle to start charging
    async fn start_charge(&self, vehicle_id: &str) -> Result<()>;

    /// Ask the vehicle to stop charging
    async fn stop_charge(&self, vehicle_id: &str) -> Result<()>;
}
