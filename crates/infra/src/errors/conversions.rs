//! Conversions from external infrastructure errors into domain errors.

use fleetlink_common::auth::{AuthClientError, TokenStoreError};
use fleetlink_domain::FleetError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub FleetError);

impl From<InfraError> for FleetError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<FleetError> for InfraError {
    fn from(value: FleetError) -> Self {
        Self(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoFleetError {
    fn into_fleet(self) -> FleetError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → FleetError */
/* -------------------------------------------------------------------------- */

impl IntoFleetError for HttpError {
    fn into_fleet(self) -> FleetError {
        let target = self.url().map(ToString::to_string).unwrap_or_else(|| "<unknown>".into());

        if self.is_builder() {
            FleetError::Config(format!("invalid HTTP request for {target}: {self}"))
        } else if self.is_timeout() {
            FleetError::Network(format!("http request to {target} timed out"))
        } else if self.is_connect() {
            FleetError::Network(format!("http connection to {target} failed: {self}"))
        } else if self.is_decode() {
            FleetError::Fetch(format!("failed to decode http response from {target}: {self}"))
        } else if let Some(status) = self.status() {
            FleetError::Network(format!("http {target} returned status {status}"))
        } else {
            FleetError::Network(format!("http request to {target} failed: {self}"))
        }
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_fleet())
    }
}

/* -------------------------------------------------------------------------- */
/* token endpoint errors → FleetError */
/* -------------------------------------------------------------------------- */

impl IntoFleetError for AuthClientError {
    fn into_fleet(self) -> FleetError {
        match self {
            AuthClientError::RequestFailed(err) if err.is_timeout() || err.is_connect() => {
                FleetError::Auth(format!("token endpoint unreachable: {err}"))
            }
            other => FleetError::Auth(other.to_string()),
        }
    }
}

impl From<AuthClientError> for InfraError {
    fn from(value: AuthClientError) -> Self {
        Self(value.into_fleet())
    }
}

impl From<TokenStoreError> for InfraError {
    fn from(value: TokenStoreError) -> Self {
        match value {
            TokenStoreError::Exchange(err) => Self(err.into_fleet()),
            TokenStoreError::NoRefreshToken => {
                Self(FleetError::Auth("no refresh token available".into()))
            }
        }
    }
}
