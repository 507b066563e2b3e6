//! Error types used throughout the workspace

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for fleetlink
///
/// Errors are `Clone` so a single failed telemetry fetch can be handed to
/// every caller that was waiting on it.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum FleetError {
    /// Bad or missing configuration (credentials, URLs). Fatal at construction.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Token exchange failed or the remote side rejected the bearer token.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The configured VIN does not resolve to a vehicle on the account.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The telemetry call failed.
    #[error("Telemetry fetch failed: {0}")]
    Fetch(String),

    /// A charge start/stop action was refused by the remote side.
    #[error("Control action failed: {0}")]
    ControlAction(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FleetError {
    /// Whether the error signals a configuration problem that retrying
    /// cannot fix.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::NotFound(_))
    }
}

/// Result type alias for fleetlink operations
pub type Result<T> = std::result::Result<T, FleetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_errors_are_config_and_not_found() {
        assert!(FleetError::Config("x".into()).is_fatal());
        assert!(FleetError::NotFound("x".into()).is_fatal());
        assert!(!FleetError::Auth("x".into()).is_fatal());
        assert!(!FleetError::Fetch("x".into()).is_fatal());
        assert!(!FleetError::ControlAction("x".into()).is_fatal());
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(FleetError::NotFound("vin".into())).unwrap();
        assert_eq!(json["type"], "NotFound");
        assert_eq!(json["message"], "vin");
    }
}
