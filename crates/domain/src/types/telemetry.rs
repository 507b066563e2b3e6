//! Bulk telemetry snapshot and the charge status derived from it

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::CHARGING_INDICATOR;

/// Charging indicator as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChargingIndicator {
    Charging,
    #[default]
    NotCharging,
    Other(String),
}

impl From<String> for ChargingIndicator {
    fn from(value: String) -> Self {
        match value.as_str() {
            CHARGING_INDICATOR => Self::Charging,
            "NotCharging" => Self::NotCharging,
            _ => Self::Other(value),
        }
    }
}

impl From<ChargingIndicator> for String {
    fn from(value: ChargingIndicator) -> Self {
        match value {
            ChargingIndicator::Charging => CHARGING_INDICATOR.to_string(),
            ChargingIndicator::NotCharging => "NotCharging".to_string(),
            ChargingIndicator::Other(raw) => raw,
        }
    }
}

/// Snapshot returned by `GET /v1/vehicles/{id}/bulk`.
///
/// Produced whole by each successful call and superseded by the next one.
/// The provider omits or nulls metrics the vehicle does not report; those
/// decode as zero (or not charging) so the other readings stay usable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkTelemetry {
    /// Battery level in percent (0-100).
    #[serde(default, deserialize_with = "null_as_default")]
    pub level: f64,
    /// Remaining range in km.
    #[serde(default, deserialize_with = "null_as_default")]
    pub range: f64,
    /// Odometer reading in km.
    #[serde(default, deserialize_with = "null_as_default")]
    pub odometer: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub charging: ChargingIndicator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge_remaining_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Provider timestamp in milliseconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl BulkTelemetry {
    /// Remaining range truncated to whole kilometres.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn range_km(&self) -> i64 {
        self.range as i64
    }

    #[must_use]
    pub fn is_charging(&self) -> bool {
        self.charging == ChargingIndicator::Charging
    }
}

/// Charge status exposed by the charge-state facet.
///
/// Variants follow the IEC 61851 states A/B/C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeStatus {
    /// State A: no vehicle connected or no telemetry available.
    #[default]
    Disconnected,
    /// State B: connected, not charging.
    Connected,
    /// State C: charging.
    Charging,
}

impl ChargeStatus {
    /// Derives the status from an optional snapshot; no snapshot means
    /// disconnected.
    #[must_use]
    pub fn from_telemetry(telemetry: Option<&BulkTelemetry>) -> Self {
        match telemetry {
            Some(bulk) if bulk.is_charging() => Self::Charging,
            Some(_) => Self::Connected,
            None => Self::Disconnected,
        }
    }
}
