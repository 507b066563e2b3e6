//! Vehicle records as listed by the fleet API

use std::fmt;

use serde::{Deserialize, Serialize};

/// A permission grant on a vehicle record.
///
/// The provider uses a fixed vocabulary; tags outside it are kept verbatim in
/// [`Scope::Other`] so a newer provider never breaks deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Scope {
    ReadVin,
    ReadVehicleInfo,
    ReadOdometer,
    ReadCharge,
    ReadBattery,
    ReadLocation,
    WriteChargeStartStop,
    WriteWakeUp,
    Other(String),
}

impl Scope {
    /// Wire representation of the scope tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::ReadVin => "read_vin",
            Self::ReadVehicleInfo => "read_vehicle_info",
            Self::ReadOdometer => "read_odometer",
            Self::ReadCharge => "read_charge",
            Self::ReadBattery => "read_battery",
            Self::ReadLocation => "read_location",
            Self::WriteChargeStartStop => "write_charge_start_stop",
            Self::WriteWakeUp => "write_wake_up",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for Scope {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "read_vin" => Self::ReadVin,
            "read_vehicle_info" => Self::ReadVehicleInfo,
            "read_odometer" => Self::ReadOdometer,
            "read_charge" => Self::ReadCharge,
            "read_battery" => Self::ReadBattery,
            "read_location" => Self::ReadLocation,
            "write_charge_start_stop" => Self::WriteChargeStartStop,
            "write_wake_up" => Self::WriteWakeUp,
            _ => Self::Other(tag),
        }
    }
}

impl From<&str> for Scope {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl From<Scope> for String {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vehicle visible to the authenticated account.
///
/// Fetched once per session from the catalog listing and immutable
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Opaque provider identifier used in every per-vehicle path.
    pub id: String,
    pub vin: String,
    #[serde(default)]
    pub scopes: Vec<Scope>,
    #[serde(default, rename = "displayName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Vehicle {
    pub fn new(id: impl Into<String>, vin: impl Into<String>, scopes: Vec<Scope>) -> Self {
        Self { id: id.into(), vin: vin.into(), scopes, display_name: None }
    }

    /// VIN normalized for comparison.
    #[must_use]
    pub fn normalized_vin(&self) -> String {
        self.vin.trim().to_uppercase()
    }

    #[must_use]
    pub fn has_scope(&self, scope: &Scope) -> bool {
        self.scopes.contains(scope)
    }
}

/// Envelope returned by `GET /v1/vehicles`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VehicleList {
    #[serde(default)]
    pub data: Vec<Vehicle>,
}
