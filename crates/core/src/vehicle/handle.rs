//! Composed vehicle handle and its optional facets
//!
//! A handle always exposes state of charge and range. Charge status, odometer
//! and charge control are separate facet values that exist only when the
//! vehicle's scopes grant them; an absent facet is `None` at the accessor.

use std::sync::Arc;

use fleetlink_common::cache::CacheStats;
use fleetlink_common::time::{Clock, SystemClock};
use fleetlink_domain::{ChargeStatus, Result, Vehicle, VehicleConfig};
use tracing::{debug, info, warn};

use super::capabilities::Capabilities;
use super::ports::ChargeActions;
use super::telemetry::CachedTelemetry;

/// User-facing vehicle settings carried on the handle
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VehicleSettings {
    pub title: String,
    /// Usable battery capacity in kWh
    pub capacity: f64,
}

impl VehicleSettings {
    pub fn new(title: impl Into<String>, capacity: f64) -> Self {
        Self { title: title.into(), capacity }
    }
}

impl From<&VehicleConfig> for VehicleSettings {
    fn from(config: &VehicleConfig) -> Self {
        Self::new(config.title.clone(), config.capacity)
    }
}

/// Charge status, enabled by `read_charge`
pub struct ChargeStateFacet<C: Clock = SystemClock> {
    telemetry: Arc<CachedTelemetry<C>>,
}

impl<C: Clock> ChargeStateFacet<C> {
    /// `Charging` when the provider reports charging, otherwise `Connected`
    ///
    /// # Errors
    /// The telemetry fetch error.
    pub async fn status(&self) -> Result<ChargeStatus> {
        let bulk = self.telemetry.bulk().await?;
        Ok(ChargeStatus::from_telemetry(Some(&bulk)))
    }

    /// Like [`status`](Self::status) but reports `Disconnected` when no
    /// telemetry is available
    pub async fn status_or_disconnected(&self) -> ChargeStatus {
        match self.status().await {
            Ok(status) => status,
            Err(e) => {
                warn!(error = %e, "charge status unavailable, reporting disconnected");
                ChargeStatus::from_telemetry(None)
            }
        }
    }
}

/// Odometer reading, enabled by `read_odometer`
pub struct OdometerFacet<C: Clock = SystemClock> {
    telemetry: Arc<CachedTelemetry<C>>,
}

impl<C: Clock> OdometerFacet<C> {
    /// Odometer in km
    ///
    /// # Errors
    /// The telemetry fetch error.
    pub async fn odometer(&self) -> Result<f64> {
        Ok(self.telemetry.bulk().await?.odometer)
    }
}

/// Start and stop charging, enabled by `write_charge_start_stop`
///
/// Actions go straight to the provider; they never touch the telemetry cache.
pub struct ChargeControlFacet {
    vehicle_id: String,
    actions: Arc<dyn ChargeActions>,
}

impl ChargeControlFacet {
    /// # Errors
    /// `FleetError::ControlAction` when the provider refuses.
    pub async fn start_charge(&self) -> Result<()> {
        info!(vehicle_id = %self.vehicle_id, "starting charge");
        self.actions.start_charge(&self.vehicle_id).await
    }

    /// # Errors
    /// `FleetError::ControlAction` when the provider refuses.
    pub async fn stop_charge(&self) -> Result<()> {
        info!(vehicle_id = %self.vehicle_id, "stopping charge");
        self.actions.stop_charge(&self.vehicle_id).await
    }

    /// Start when `enable` is true, stop otherwise
    ///
    /// # Errors
    /// See [`start_charge`](Self::start_charge).
    pub async fn set_charging(&self, enable: bool) -> Result<()> {
        if enable {
            self.start_charge().await
        } else {
            self.stop_charge().await
        }
    }
}

/// A vehicle with the facets its scopes allow
pub struct VehicleHandle<C: Clock = SystemClock> {
    vehicle: Vehicle,
    settings: VehicleSettings,
    capabilities: Capabilities,
    telemetry: Arc<CachedTelemetry<C>>,
    charge_state: Option<ChargeStateFacet<C>>,
    odometer: Option<OdometerFacet<C>>,
    charge_control: Option<ChargeControlFacet>,
}

impl<C: Clock> VehicleHandle<C> {
    /// Build the handle for `vehicle`, enabling facets from its scopes
    pub fn compose(
        vehicle: Vehicle,
        settings: VehicleSettings,
        telemetry: Arc<CachedTelemetry<C>>,
        actions: Arc<dyn ChargeActions>,
    ) -> Self {
        let capabilities = Capabilities::for_vehicle(&vehicle);
        debug!(vehicle_id = %vehicle.id, ?capabilities, "composing vehicle handle");

        let charge_state = capabilities
            .charge_state
            .then(|| ChargeStateFacet { telemetry: Arc::clone(&telemetry) });
        let odometer =
            capabilities.odometer.then(|| OdometerFacet { telemetry: Arc::clone(&telemetry) });
        let charge_control = capabilities
            .charge_control
            .then(|| ChargeControlFacet { vehicle_id: vehicle.id.clone(), actions });

        Self { vehicle, settings, capabilities, telemetry, charge_state, odometer, charge_control }
    }

    /// State of charge in percent
    ///
    /// # Errors
    /// The telemetry fetch error.
    pub async fn soc(&self) -> Result<f64> {
        Ok(self.telemetry.bulk().await?.level)
    }

    /// Remaining range in whole km
    ///
    /// # Errors
    /// The telemetry fetch error.
    pub async fn range(&self) -> Result<i64> {
        Ok(self.telemetry.bulk().await?.range_km())
    }

    #[must_use]
    pub fn charge_state(&self) -> Option<&ChargeStateFacet<C>> {
        self.charge_state.as_ref()
    }

    #[must_use]
    pub fn odometer(&self) -> Option<&OdometerFacet<C>> {
        self.odometer.as_ref()
    }

    #[must_use]
    pub fn charge_control(&self) -> Option<&ChargeControlFacet> {
        self.charge_control.as_ref()
    }

    /// The vehicle's VIN
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.vehicle.vin
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.settings.title
    }

    #[must_use]
    pub fn capacity(&self) -> f64 {
        self.settings.capacity
    }

    #[must_use]
    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Drop the cached snapshot so the next read fetches
    pub fn refresh_telemetry(&self) {
        self.telemetry.invalidate();
    }

    #[must_use]
    pub fn telemetry_stats(&self) -> CacheStats {
        self.telemetry.stats()
    }
}
