//! Application constants
//!
//! Centralized location for the domain-level constants used throughout the
//! workspace.

// Remote fleet API
pub const DEFAULT_API_BASE_URL: &str = "https://api.tronity.tech";
pub const DEFAULT_TOKEN_URL: &str = "https://api.tronity.tech/authentication";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

// Telemetry cache
pub const DEFAULT_CACHE_TTL_SECS: u64 = 15 * 60;

// Charging indicator value reported while energy is flowing
pub const CHARGING_INDICATOR: &str = "Charging";
