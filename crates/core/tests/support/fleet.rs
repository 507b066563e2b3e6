use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use fleetlink_core::{ChargeActions, FleetDirectory, TelemetrySource};
use fleetlink_domain::{BulkTelemetry, ChargingIndicator, FleetError, Result, Scope, Vehicle};

/// In-memory fleet provider.
///
/// Serves a fixed vehicle list, a configurable bulk outcome and records every
/// call. An optional delay keeps bulk fetches in flight long enough for
/// concurrent readers to pile up.
pub struct FakeFleet {
    vehicles: Vec<Vehicle>,
    bulk: Mutex<Result<BulkTelemetry>>,
    action: Mutex<Result<()>>,
    delay: Duration,
    pub list_calls: AtomicUsize,
    pub bulk_calls: AtomicUsize,
    pub start_calls: AtomicUsize,
    pub stop_calls: AtomicUsize,
}

impl FakeFleet {
    /// Create a fake with the given vehicles and a default snapshot.
    pub fn new(vehicles: Vec<Vehicle>) -> Self {
        Self {
            vehicles,
            bulk: Mutex::new(Ok(snapshot(72.5, 210.0, ChargingIndicator::NotCharging))),
            action: Mutex::new(Ok(())),
            delay: Duration::ZERO,
            list_calls: AtomicUsize::new(0),
            bulk_calls: AtomicUsize::new(0),
            start_calls: AtomicUsize::new(0),
            stop_calls: AtomicUsize::new(0),
        }
    }

    /// Delay every bulk fetch.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Replace the outcome returned by subsequent bulk fetches.
    pub fn set_bulk(&self, outcome: Result<BulkTelemetry>) {
        *self.bulk.lock().unwrap() = outcome;
    }

    /// Replace the outcome returned by subsequent charge actions.
    pub fn set_action(&self, outcome: Result<()>) {
        *self.action.lock().unwrap() = outcome;
    }

    pub fn bulk_calls(&self) -> usize {
        self.bulk_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FleetDirectory for FakeFleet {
    async fn vehicles(&self) -> Result<Vec<Vehicle>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.vehicles.clone())
    }
}

#[async_trait]
impl TelemetrySource for FakeFleet {
    async fn bulk(&self, vehicle_id: &str) -> Result<BulkTelemetry> {
        self.bulk_calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if !self.vehicles.iter().any(|v| v.id == vehicle_id) {
            return Err(FleetError::Fetch(format!("unknown vehicle {vehicle_id}")));
        }
        self.bulk.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChargeActions for FakeFleet {
    async fn start_charge(&self, _vehicle_id: &str) -> Result<()> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        self.action.lock().unwrap().clone()
    }

    async fn stop_charge(&self, _vehicle_id: &str) -> Result<()> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        self.action.lock().unwrap().clone()
    }
}

/// Bulk snapshot with the given level, range and charging indicator.
pub fn snapshot(level: f64, range: f64, charging: ChargingIndicator) -> BulkTelemetry {
    BulkTelemetry { level, range, odometer: 15_321.0, charging, ..Default::default() }
}

/// Vehicle with the given scope tags.
pub fn vehicle(id: &str, vin: &str, scopes: &[&str]) -> Vehicle {
    Vehicle::new(id, vin, scopes.iter().copied().map(Scope::from).collect())
}
