//! Vehicle connection service - resolve, then compose

use std::sync::Arc;
use std::time::Duration;

use fleetlink_common::time::{Clock, SystemClock};
use fleetlink_domain::Result;
use tracing::info;

use super::catalog::FleetCatalog;
use super::handle::{VehicleHandle, VehicleSettings};
use super::ports::{ChargeActions, FleetDirectory, TelemetrySource};
use super::telemetry::CachedTelemetry;

/// Turns a configured VIN into a composed [`VehicleHandle`]
pub struct VehicleConnector {
    catalog: FleetCatalog,
    telemetry: Arc<dyn TelemetrySource>,
    actions: Arc<dyn ChargeActions>,
}

impl VehicleConnector {
    pub fn new(
        directory: Arc<dyn FleetDirectory>,
        telemetry: Arc<dyn TelemetrySource>,
        actions: Arc<dyn ChargeActions>,
    ) -> Self {
        Self { catalog: FleetCatalog::new(directory), telemetry, actions }
    }

    /// Resolve `vin` and build its handle with a `cache_ttl` telemetry cache
    ///
    /// # Errors
    /// `FleetError::NotFound` for an unknown VIN, or the listing error.
    pub async fn connect(
        &self,
        vin: &str,
        settings: VehicleSettings,
        cache_ttl: Duration,
    ) -> Result<VehicleHandle<SystemClock>> {
        self.connect_with_clock(vin, settings, cache_ttl, SystemClock).await
    }

    /// [`connect`](Self::connect) with a custom clock for the telemetry cache
    ///
    /// # Errors
    /// See [`connect`](Self::connect).
    pub async fn connect_with_clock<C: Clock>(
        &self,
        vin: &str,
        settings: VehicleSettings,
        cache_ttl: Duration,
        clock: C,
    ) -> Result<VehicleHandle<C>> {
        let vehicle = self.catalog.resolve_vehicle(vin).await?;
        let telemetry = Arc::new(CachedTelemetry::with_clock(
            vehicle.id.clone(),
            Arc::clone(&self.telemetry),
            cache_ttl,
            clock,
        ));

        let handle = VehicleHandle::compose(vehicle, settings, telemetry, Arc::clone(&self.actions));
        info!(
            vin = handle.identifier(),
            capabilities = ?handle.capabilities(),
            cache_ttl_secs = cache_ttl.as_secs(),
            "vehicle connected"
        );
        Ok(handle)
    }
}
