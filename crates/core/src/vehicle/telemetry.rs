//! Cached bulk telemetry for one vehicle

use std::sync::Arc;
use std::time::Duration;

use fleetlink_common::cache::{CacheStats, SingleFlightCache};
use fleetlink_common::time::{Clock, SystemClock};
use fleetlink_domain::{BulkTelemetry, FleetError, Result};

use super::ports::TelemetrySource;

/// Single-flight TTL cache in front of [`TelemetrySource::bulk`]
///
/// Every read accessor of a vehicle handle goes through one instance, so
/// reading SoC, range and status back to back costs at most one remote call
/// per TTL window.
pub struct CachedTelemetry<C: Clock = SystemClock> {
    vehicle_id: String,
    source: Arc<dyn TelemetrySource>,
    cache: SingleFlightCache<BulkTelemetry, FleetError, C>,
}

impl CachedTelemetry<SystemClock> {
    pub fn new(vehicle_id: impl Into<String>, source: Arc<dyn TelemetrySource>, ttl: Duration) -> Self {
        Self::with_clock(vehicle_id, source, ttl, SystemClock)
    }
}

impl<C: Clock> CachedTelemetry<C> {
    pub fn with_clock(
        vehicle_id: impl Into<String>,
        source: Arc<dyn TelemetrySource>,
        ttl: Duration,
        clock: C,
    ) -> Self {
        Self { vehicle_id: vehicle_id.into(), source, cache: SingleFlightCache::with_clock(ttl, clock) }
    }

    /// Current snapshot, fetched at most once per TTL
    ///
    /// # Errors
    /// The cached or freshly observed fetch error, unchanged.
    pub async fn bulk(&self) -> Result<BulkTelemetry> {
        let source = Arc::clone(&self.source);
        let vehicle_id = self.vehicle_id.clone();
        self.cache.get_or_fetch(move || async move { source.bulk(&vehicle_id).await }).await
    }

    /// Force the next read to fetch
    pub fn invalidate(&self) {
        self.cache.invalidate();
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.cache.ttl()
    }

    #[must_use]
    pub fn vehicle_id(&self) -> &str {
        &self.vehicle_id
    }
}
