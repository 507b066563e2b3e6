//! HTTP implementation of the fleet ports
//!
//! | port               | request                                 |
//! |--------------------|-----------------------------------------|
//! | `FleetDirectory`   | `GET  /v1/vehicles`                     |
//! | `TelemetrySource`  | `GET  /v1/vehicles/{id}/bulk`           |
//! | `ChargeActions`    | `POST /v1/vehicles/{id}/charge_start`   |
//! |                    | `POST /v1/vehicles/{id}/charge_stop`    |

use std::sync::Arc;

use async_trait::async_trait;
use fleetlink_core::{ChargeActions, FleetDirectory, TelemetrySource};
use fleetlink_domain::{BulkTelemetry, FleetError, Result, Vehicle, VehicleList};
use tracing::{debug, info};

use crate::api::{ApiClient, ApiError};

const VEHICLES_PATH: &str = "/v1/vehicles";

/// Fleet provider adapter over an authorized [`ApiClient`]
#[derive(Clone)]
pub struct FleetApi {
    client: Arc<ApiClient>,
}

impl FleetApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    fn vehicle_path(vehicle_id: &str, action: &str) -> String {
        format!("{VEHICLES_PATH}/{vehicle_id}/{action}")
    }

    async fn charge_action(&self, vehicle_id: &str, action: &str) -> Result<()> {
        match self.client.post_action(&Self::vehicle_path(vehicle_id, action)).await {
            Ok(()) => {
                info!(vehicle_id, action, "charge action accepted");
                Ok(())
            }
            // The provider answers 405 when the vehicle is already in the
            // requested state.
            Err(err) if err.status() == Some(405) => {
                debug!(vehicle_id, action, "charge action not applicable, ignoring 405");
                Ok(())
            }
            // Any other answer from the provider is a refusal, whatever its status.
            Err(err) if err.status().is_some() => Err(FleetError::ControlAction(err.to_string())),
            Err(err) => Err(err.into_fleet(FleetError::ControlAction)),
        }
    }
}

#[async_trait]
impl FleetDirectory for FleetApi {
    async fn vehicles(&self) -> Result<Vec<Vehicle>> {
        let list: VehicleList = self
            .client
            .get_json(VEHICLES_PATH)
            .await
            .map_err(|err: ApiError| err.into_fleet(FleetError::Network))?;

        debug!(count = list.data.len(), "listed vehicles");
        Ok(list.data)
    }
}

#[async_trait]
impl TelemetrySource for FleetApi {
    async fn bulk(&self, vehicle_id: &str) -> Result<BulkTelemetry> {
        self.client
            .get_json(&Self::vehicle_path(vehicle_id, "bulk"))
            .await
            .map_err(|err: ApiError| err.into_fleet(FleetError::Fetch))
    }
}

#[async_trait]
impl ChargeActions for FleetApi {
    async fn start_charge(&self, vehicle_id: &str) -> Result<()> {
        self.charge_action(vehicle_id, "charge_start").await
    }

    async fn stop_charge(&self, vehicle_id: &str) -> Result<()> {
        self.charge_action(vehicle_id, "charge_stop").await
    }
}
