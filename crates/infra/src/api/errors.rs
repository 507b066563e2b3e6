//! API-specific error types
//!
//! Classifies failures of authorized calls against the fleet API so the
//! adapters can translate them into domain errors.

use std::time::Duration;

use fleetlink_domain::FleetError;
use reqwest::StatusCode;
use thiserror::Error;

use crate::errors::InfraError;

/// Categories of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Token acquisition failed or the bearer token was rejected twice.
    /// A 403 is not one of these: the token was accepted, the call was not.
    Authentication,
    /// Rate limiting errors (429)
    RateLimit,
    /// Server errors (5xx) that survived the HTTP retries
    Server,
    /// Client errors (4xx except auth)
    Client,
    /// Network/connection errors and timeouts
    Network,
    /// Configuration errors
    Config,
    /// Response body did not match the expected shape
    Decode,
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Client error ({status}): {message}")]
    Client { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Get the error category for this error
    #[must_use]
    pub const fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Auth(_) => ApiErrorCategory::Authentication,
            Self::RateLimit(_) => ApiErrorCategory::RateLimit,
            Self::Server { .. } => ApiErrorCategory::Server,
            Self::Client { .. } => ApiErrorCategory::Client,
            Self::Network(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::Config(_) => ApiErrorCategory::Config,
            Self::Decode(_) => ApiErrorCategory::Decode,
        }
    }

    /// HTTP status behind the error, when there was one
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } | Self::Client { status, .. } => Some(*status),
            Self::RateLimit(_) => Some(429),
            _ => None,
        }
    }

    /// Classify a non-success response.
    pub fn from_status(status: StatusCode, url: &str, body: &str) -> Self {
        let message = if body.is_empty() {
            format!("{url} returned status {status}")
        } else {
            format!("{url} returned status {status}: {body}")
        };

        if status == StatusCode::UNAUTHORIZED {
            Self::Auth(message)
        } else if status == StatusCode::TOO_MANY_REQUESTS {
            Self::RateLimit(message)
        } else if status.is_server_error() {
            Self::Server { status: status.as_u16(), message }
        } else if status.is_client_error() {
            Self::Client { status: status.as_u16(), message }
        } else {
            Self::Network(message)
        }
    }

    /// Convert into a domain error.
    ///
    /// Authentication and configuration failures keep their domain meaning;
    /// everything else is handed to `wrap`, which names the operation that
    /// failed (`FleetError::Fetch`, `FleetError::ControlAction`, ...).
    pub fn into_fleet(self, wrap: fn(String) -> FleetError) -> FleetError {
        match self {
            Self::Auth(message) => FleetError::Auth(message),
            Self::Config(message) => FleetError::Config(message),
            other => wrap(other.to_string()),
        }
    }
}

impl From<FleetError> for ApiError {
    fn from(err: FleetError) -> Self {
        match err {
            FleetError::Auth(message) => Self::Auth(message),
            FleetError::Config(message) => Self::Config(message),
            FleetError::Network(message) => Self::Network(message),
            FleetError::Fetch(message) => Self::Decode(message),
            other => Self::Network(other.to_string()),
        }
    }
}

impl From<fleetlink_common::auth::TokenStoreError> for ApiError {
    fn from(err: fleetlink_common::auth::TokenStoreError) -> Self {
        Self::from(FleetError::from(InfraError::from(err)))
    }
}
