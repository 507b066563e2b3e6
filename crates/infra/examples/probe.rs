//! Example: Connecting to a vehicle and reading its telemetry
//!
//! Loads the configuration (environment first, then `fleetlink.toml`),
//! connects, and logs every reading the vehicle's scopes allow.
//!
//! # Usage
//!
//! ```bash
//! export FLEETLINK_CLIENT_ID=...
//! export FLEETLINK_CLIENT_SECRET=...
//! export FLEETLINK_VIN=...            # optional with a single vehicle
//! RUST_LOG=debug cargo run --example probe
//! ```
//!
//! Set `FLEETLINK_LOG_FORMAT=json` for JSON output.

use anyhow::Context;
use fleetlink_infra::{config, init_logging, LogFormat, VehicleFactory};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let format = std::env::var("FLEETLINK_LOG_FORMAT").map(|f| LogFormat::from_name(&f)).unwrap_or_default();
    init_logging(format)?;

    let config = config::load().context("loading configuration")?;
    let vehicle = VehicleFactory::connect(&config).await.context("connecting to vehicle")?;

    info!(
        vin = vehicle.identifier(),
        title = vehicle.title(),
        capacity_kwh = vehicle.capacity(),
        capabilities = ?vehicle.capabilities(),
        "connected"
    );

    let soc = vehicle.soc().await.context("reading state of charge")?;
    let range = vehicle.range().await.context("reading range")?;
    info!(soc, range_km = range, "battery");

    if let Some(charge_state) = vehicle.charge_state() {
        info!(status = ?charge_state.status_or_disconnected().await, "charge status");
    }

    match vehicle.odometer() {
        Some(odometer) => match odometer.odometer().await {
            Ok(km) => info!(odometer_km = km, "odometer"),
            Err(e) => warn!(error = %e, "odometer unavailable"),
        },
        None => info!("odometer not granted"),
    }

    if vehicle.charge_control().is_some() {
        info!("charge control available");
    }

    let stats = vehicle.telemetry_stats();
    info!(fetches = stats.fetches, hits = stats.hits, joins = stats.joins, "telemetry cache");

    Ok(())
}
