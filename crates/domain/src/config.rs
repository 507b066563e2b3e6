//! Configuration structures
//!
//! Plain serde structures; loading from files and the environment lives in
//! `fleetlink-infra::config`.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_CACHE_TTL_SECS, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_TOKEN_URL,
};
use crate::errors::{FleetError, Result};

/// OAuth client credentials issued by the provider.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientCredentials {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub secret: String,
}

impl ClientCredentials {
    pub fn new(id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self { id: id.into(), secret: secret.into() }
    }

    /// Both id and secret must be non-empty.
    ///
    /// # Errors
    /// Returns `FleetError::Config` naming the missing part.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(FleetError::Config("missing credentials id".to_string()));
        }
        if self.secret.trim().is_empty() {
            return Err(FleetError::Config("missing credentials secret".to_string()));
        }
        Ok(())
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("id", &self.id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Previously obtained access + refresh token pair.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredTokens {
    #[serde(default)]
    pub access: String,
    #[serde(default)]
    pub refresh: String,
}

impl StoredTokens {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self { access: access.into(), refresh: refresh.into() }
    }

    /// A usable pair has both tokens set.
    ///
    /// # Errors
    /// Returns `FleetError::Config` when either token is empty. Callers treat
    /// this as a mode selector (app flow), not a failure.
    pub fn validate(&self) -> Result<()> {
        if self.access.trim().is_empty() || self.refresh.trim().is_empty() {
            return Err(FleetError::Config("missing access and/or refresh token".to_string()));
        }
        Ok(())
    }
}

impl fmt::Debug for StoredTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredTokens")
            .field("access", &if self.access.is_empty() { "<empty>" } else { "<redacted>" })
            .field("refresh", &if self.refresh.is_empty() { "<empty>" } else { "<redacted>" })
            .finish()
    }
}

/// Remote endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl ApiSettings {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token_url: default_token_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Per-vehicle configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VehicleConfig {
    /// Display title of the vehicle.
    #[serde(default)]
    pub title: String,
    /// Usable battery capacity in kWh.
    #[serde(default)]
    pub capacity: f64,
    #[serde(default)]
    pub credentials: ClientCredentials,
    #[serde(default)]
    pub tokens: StoredTokens,
    /// VIN to select; empty selects the only vehicle on the account.
    #[serde(default)]
    pub vin: String,
    /// Telemetry cache time-to-live in seconds.
    #[serde(default = "default_cache_seconds")]
    pub cache_seconds: u64,
    #[serde(default)]
    pub api: ApiSettings,
}

impl VehicleConfig {
    pub fn new(credentials: ClientCredentials) -> Self {
        Self {
            title: String::new(),
            capacity: 0.0,
            credentials,
            tokens: StoredTokens::default(),
            vin: String::new(),
            cache_seconds: default_cache_seconds(),
            api: ApiSettings::default(),
        }
    }

    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_seconds)
    }
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

const fn default_timeout_seconds() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

const fn default_cache_seconds() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_require_id_and_secret() {
        assert!(ClientCredentials::new("id", "secret").validate().is_ok());
        assert_eq!(
            ClientCredentials::new("", "secret").validate(),
            Err(FleetError::Config("missing credentials id".to_string()))
        );
        assert_eq!(
            ClientCredentials::new("id", " ").validate(),
            Err(FleetError::Config("missing credentials secret".to_string()))
        );
    }

    #[test]
    fn stored_tokens_need_both_parts() {
        assert!(StoredTokens::new("a", "r").validate().is_ok());
        assert!(StoredTokens::new("a", "").validate().is_err());
        assert!(StoredTokens::default().validate().is_err());
    }

    #[test]
    fn debug_output_hides_secrets() {
        let rendered = format!(
            "{:?} {:?}",
            ClientCredentials::new("client", "s3cr3t"),
            StoredTokens::new("acc", "ref")
        );
        assert!(rendered.contains("client"));
        assert!(!rendered.contains("s3cr3t"));
        assert!(!rendered.contains("acc\""));
    }

    #[test]
    fn defaults_fill_missing_sections() {
        let config: VehicleConfig =
            serde_json::from_str(r#"{"credentials": {"id": "a", "secret": "b"}}"#).unwrap();
        assert_eq!(config.cache_ttl(), Duration::from_secs(DEFAULT_CACHE_TTL_SECS));
        assert_eq!(config.api.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.api.timeout(), Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));
        assert!(config.vin.is_empty());
        assert!(config.tokens.validate().is_err());
    }
}
