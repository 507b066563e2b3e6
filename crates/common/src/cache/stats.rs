//! Cache statistics and metrics tracking
//!
//! Counters for the single-flight cache: how many reads were served from the
//! cached entry, how many started a remote fetch, and how many piggybacked on
//! a fetch another caller had already started.

use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics snapshot for cache performance monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Reads answered from a fresh entry
    pub hits: u64,

    /// Reads that found no fresh entry (they either fetched or joined)
    pub misses: u64,

    /// Underlying fetches started
    pub fetches: u64,

    /// Reads that waited on a fetch started by another caller
    pub joins: u64,

    /// Fetches that completed with an error
    pub failures: u64,
}

impl CacheStats {
    /// Calculate hit rate (hits / total accesses)
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.total_accesses();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Total number of access operations (hits + misses)
    #[must_use]
    pub const fn total_accesses(&self) -> u64 {
        self.hits + self.misses
    }
}

/// Thread-safe metrics collector for cache operations
///
/// Atomic counters, no locks.
#[derive(Debug, Default)]
pub(crate) struct MetricsCollector {
    hits: AtomicU64,
    misses: AtomicU64,
    fetches: AtomicU64,
    joins: AtomicU64,
    failures: AtomicU64,
}

impl MetricsCollector {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_fetch(&self) {
        self.fetches.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_join(&self) {
        self.joins.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current statistics snapshot
    pub(crate) fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            fetches: self.fetches.load(Ordering::Relaxed),
            joins: self.joins.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}
