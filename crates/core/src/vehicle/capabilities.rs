//! Scope → facet decision table

use fleetlink_domain::{Scope, Vehicle};

/// Optional facets enabled for a vehicle.
///
/// | scope                     | facet                         |
/// |---------------------------|-------------------------------|
/// | `read_charge`             | charge status                 |
/// | `read_odometer`           | odometer                      |
/// | `write_charge_start_stop` | start + stop charge (one)     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub charge_state: bool,
    pub odometer: bool,
    pub charge_control: bool,
}

impl Capabilities {
    #[must_use]
    pub fn from_scopes(scopes: &[Scope]) -> Self {
        Self {
            charge_state: scopes.contains(&Scope::ReadCharge),
            odometer: scopes.contains(&Scope::ReadOdometer),
            charge_control: scopes.contains(&Scope::WriteChargeStartStop),
        }
    }

    #[must_use]
    pub fn for_vehicle(vehicle: &Vehicle) -> Self {
        Self::from_scopes(&vehicle.scopes)
    }
}
