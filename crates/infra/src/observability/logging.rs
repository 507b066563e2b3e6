//! Tracing subscriber installation
//!
//! `RUST_LOG` overrides the default filter. Token values never reach the log:
//! token types redact themselves in `Debug` and call sites log identifiers
//! only.

use fleetlink_domain::FleetError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Filter used when `RUST_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "info,hyper=warn,reqwest=warn";

/// Output format of the installed subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, for terminals
    #[default]
    Pretty,
    /// One JSON object per line, for log shippers
    Json,
}

impl LogFormat {
    /// `json` selects [`LogFormat::Json`]; anything else is pretty
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Install the global subscriber.
///
/// # Errors
/// `FleetError::Internal` when a global subscriber is already set.
pub fn init(format: LogFormat) -> Result<(), FleetError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = Registry::default().with(filter);

    let result = match format {
        LogFormat::Pretty => registry.with(fmt::layer().with_target(true)).try_init(),
        LogFormat::Json => {
            registry.with(fmt::layer().json().with_current_span(true).with_target(true)).try_init()
        }
    };

    result.map_err(|e| FleetError::Internal(format!("failed to install tracing subscriber: {e}")))
}

/// Stable label for an error, suitable as a log field
#[must_use]
pub const fn error_label(error: &FleetError) -> &'static str {
    match error {
        FleetError::Config(_) => "config",
        FleetError::Auth(_) => "auth",
        FleetError::NotFound(_) => "not_found",
        FleetError::Fetch(_) => "fetch",
        FleetError::ControlAction(_) => "control_action",
        FleetError::Network(_) => "network",
        FleetError::Internal(_) => "internal",
    }
}
