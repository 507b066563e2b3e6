//! VIN resolution against the account's vehicle list

use std::sync::Arc;

use fleetlink_domain::{FleetError, Result, Vehicle};
use tracing::{debug, info};

use super::ports::FleetDirectory;

/// Resolves the configured VIN to one of the account's vehicles
pub struct FleetCatalog {
    directory: Arc<dyn FleetDirectory>,
}

impl FleetCatalog {
    pub fn new(directory: Arc<dyn FleetDirectory>) -> Self {
        Self { directory }
    }

    /// List the account's vehicles once and pick the configured one
    ///
    /// # Errors
    /// `FleetError::NotFound` when no vehicle matches; listing failures are
    /// passed through unchanged.
    pub async fn resolve_vehicle(&self, configured_vin: &str) -> Result<Vehicle> {
        let vehicles = self.directory.vehicles().await?;
        debug!(count = vehicles.len(), "listed account vehicles");

        let vehicle = select_vehicle(vehicles, configured_vin)?;
        info!(vehicle_id = %vehicle.id, vin = %vehicle.vin, "resolved vehicle");
        Ok(vehicle)
    }
}

/// Pick the vehicle for `configured_vin` from `vehicles`
///
/// An empty VIN selects the only vehicle on the account. Otherwise VINs are
/// compared case-insensitively. When the listing carries the same VIN twice
/// the first entry in listing order is taken, so the result does not depend
/// on how many duplicates follow it.
///
/// # Errors
/// `FleetError::NotFound` when nothing matches, including an empty VIN on an
/// account with zero or several vehicles.
pub fn select_vehicle(vehicles: Vec<Vehicle>, configured_vin: &str) -> Result<Vehicle> {
    let wanted = configured_vin.trim().to_uppercase();

    if wanted.is_empty() {
        let count = vehicles.len();
        let mut vehicles = vehicles.into_iter();
        return match (vehicles.next(), vehicles.next()) {
            (Some(only), None) => Ok(only),
            _ => Err(FleetError::NotFound(format!(
                "no VIN configured and account has {count} vehicles"
            ))),
        };
    }

    vehicles
        .into_iter()
        .find(|vehicle| vehicle.normalized_vin() == wanted)
        .ok_or_else(|| FleetError::NotFound(format!("vehicle {wanted} not on account")))
}
