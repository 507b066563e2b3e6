//! Explicit wiring from a [`VehicleConfig`] to a connected [`VehicleHandle`]
//!
//! ```text
//! VehicleConfig
//!   ├─ credentials ─┐
//!   ├─ tokens ──────┼─> TokenClient ─> TokenStore ─> ApiAuthService
//!   └─ api ─────────┘                                   │
//!                         HttpClient ─> ApiClient <─────┘
//!                                          │
//!                                       FleetApi ─> VehicleConnector ─> VehicleHandle
//! ```

use std::sync::Arc;

use fleetlink_common::auth::{
    TokenClient, TokenEndpointConfig, TokenSet, TokenStore, DEFAULT_EXPIRY_LEEWAY_SECS,
};
use fleetlink_core::{VehicleConnector, VehicleHandle, VehicleSettings};
use fleetlink_domain::{FleetError, Result, VehicleConfig};
use tracing::{debug, info};

use crate::api::{ApiAuthService, ApiClient, ApiClientConfig};
use crate::errors::InfraError;
use crate::fleet::FleetApi;
use crate::http::HttpClient;

/// Builds vehicle handles against the remote fleet API
pub struct VehicleFactory;

impl VehicleFactory {
    /// Validate `config`, authenticate lazily, resolve the VIN and compose
    /// the handle.
    ///
    /// A complete stored token pair selects the refresh flow; otherwise every
    /// token acquisition is an app login with the client credentials.
    ///
    /// # Errors
    /// - `FleetError::Config` for missing credentials or an unusable URL
    /// - `FleetError::Auth` when no token can be obtained for the listing
    /// - `FleetError::NotFound` when the VIN is not on the account
    pub async fn connect(config: &VehicleConfig) -> Result<VehicleHandle> {
        config.credentials.validate()?;

        let initial = match config.tokens.validate() {
            Ok(()) => {
                debug!("stored token pair present, using refresh flow");
                Some(TokenSet::from_stored(&config.tokens.access, &config.tokens.refresh))
            }
            Err(_) => {
                debug!("no stored token pair, using app flow");
                None
            }
        };

        let token_client = TokenClient::new(
            TokenEndpointConfig::new(
                &config.api.token_url,
                &config.credentials.id,
                &config.credentials.secret,
            ),
            config.api.timeout(),
        )
        .map_err(|e| FleetError::from(InfraError::from(e)))?;

        let store = Arc::new(
            TokenStore::new(token_client, initial).with_leeway(DEFAULT_EXPIRY_LEEWAY_SECS),
        );

        let http_client = Arc::new(HttpClient::from_settings(&config.api)?);
        let api = ApiClient::with_http_client(
            ApiClientConfig::from(&config.api),
            Arc::new(ApiAuthService::new(store)),
            http_client,
        );
        let fleet = Arc::new(FleetApi::new(Arc::new(api)));

        let connector = VehicleConnector::new(fleet.clone(), fleet.clone(), fleet);
        let handle =
            connector.connect(&config.vin, VehicleSettings::from(config), config.cache_ttl()).await?;

        info!(vin = handle.identifier(), title = handle.title(), "vehicle ready");
        Ok(handle)
    }
}
