//! Configuration loader
//!
//! Loads the vehicle configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the client credentials are not in the environment, falls back to a
//!    file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `FLEETLINK_CLIENT_ID`: OAuth client id (required for env loading)
//! - `FLEETLINK_CLIENT_SECRET`: OAuth client secret (required for env loading)
//! - `FLEETLINK_ACCESS_TOKEN` / `FLEETLINK_REFRESH_TOKEN`: stored token pair
//! - `FLEETLINK_VIN`: VIN to select
//! - `FLEETLINK_CACHE_SECONDS`: telemetry cache TTL
//! - `FLEETLINK_TITLE`: display title
//! - `FLEETLINK_CAPACITY_KWH`: battery capacity
//! - `FLEETLINK_API_URL`, `FLEETLINK_TOKEN_URL`: endpoint overrides
//! - `FLEETLINK_TIMEOUT_SECONDS`: request timeout
//!
//! Credentials are only checked for presence here; their validity is checked
//! when a vehicle handle is built.
//!
//! ## File Locations
//! The loader probes `fleetlink.{toml,json}` then `config.{toml,json}` in the
//! current directory, its parent, and next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use fleetlink_domain::{ClientCredentials, FleetError, Result, StoredTokens, VehicleConfig};

const FILE_NAMES: [&str; 4] = ["fleetlink.toml", "fleetlink.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `FleetError::Config` if neither source yields a configuration or
/// a value cannot be parsed.
pub fn load() -> Result<VehicleConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "environment incomplete, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `FleetError::Config` if the client credentials are missing or a
/// numeric variable has an invalid value.
pub fn load_from_env() -> Result<VehicleConfig> {
    let credentials =
        ClientCredentials::new(env_var("FLEETLINK_CLIENT_ID")?, env_var("FLEETLINK_CLIENT_SECRET")?);

    let mut config = VehicleConfig::new(credentials);
    config.tokens = StoredTokens::new(
        env_opt("FLEETLINK_ACCESS_TOKEN").unwrap_or_default(),
        env_opt("FLEETLINK_REFRESH_TOKEN").unwrap_or_default(),
    );

    if let Some(vin) = env_opt("FLEETLINK_VIN") {
        config.vin = vin;
    }
    if let Some(title) = env_opt("FLEETLINK_TITLE") {
        config.title = title;
    }
    if let Some(capacity) = env_parse("FLEETLINK_CAPACITY_KWH")? {
        config.capacity = capacity;
    }
    if let Some(seconds) = env_parse("FLEETLINK_CACHE_SECONDS")? {
        config.cache_seconds = seconds;
    }
    if let Some(url) = env_opt("FLEETLINK_API_URL") {
        config.api.base_url = url;
    }
    if let Some(url) = env_opt("FLEETLINK_TOKEN_URL") {
        config.api.token_url = url;
    }
    if let Some(seconds) = env_parse("FLEETLINK_TIMEOUT_SECONDS")? {
        config.api.timeout_seconds = seconds;
    }

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations via
/// [`probe_config_paths`].
///
/// # Errors
/// Returns `FleetError::Config` if the file is missing, unreadable, or
/// malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<VehicleConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(FleetError::Config(format!("config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            FleetError::Config("no config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| FleetError::Config(format!("failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration, detecting the format by file extension
fn parse_config(contents: &str, path: &Path) -> Result<VehicleConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| FleetError::Config(format!("invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| FleetError::Config(format!("invalid JSON format: {e}"))),
        _ => Err(FleetError::Config(format!("unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        let parent = cwd.join("..");
        dirs.extend([cwd, parent]);
    }

    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
        dirs.push(exe_dir);
    }

    dirs.iter()
        .flat_map(|dir| FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    env_opt(key)
        .ok_or_else(|| FleetError::Config(format!("missing required environment variable: {key}")))
}

/// Non-empty environment variable, trimmed
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Optional environment variable parsed as `T`
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| FleetError::Config(format!("invalid value for {key}: {e}")))
        })
        .transpose()
}
