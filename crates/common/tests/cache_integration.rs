//! Integration tests for the single-flight cache
//!
//! Exercises the public API from the outside: freshness driven by a mock
//! clock, and fetch collapsing under real task concurrency.

#![cfg(feature = "runtime")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use fleetlink_common::cache::{CacheStats, SingleFlightCache};
use fleetlink_common::testing::MockClock;

#[derive(Debug, Clone, PartialEq)]
struct Snapshot {
    level: f64,
    seq: usize,
}

type SnapshotCache = SingleFlightCache<Snapshot, String, MockClock>;

fn counting_fetch(
    counter: &Arc<AtomicUsize>,
    delay: Duration,
) -> impl std::future::Future<Output = Result<Snapshot, String>> + Send + 'static {
    let counter = counter.clone();
    async move {
        tokio::time::sleep(delay).await;
        let seq = counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Snapshot { level: 72.5, seq })
    }
}

/// Validates that many concurrent readers on an empty cache share one fetch.
///
/// # Test Steps
/// 1. Spawn 32 readers against an empty cache with a slow fetch
/// 2. Verify the fetch ran once and every reader saw the same snapshot
/// 3. Verify the statistics account for one leader and 31 joiners
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_reads_collapse_into_one_fetch() {
    let cache: Arc<SnapshotCache> =
        Arc::new(SingleFlightCache::with_clock(Duration::from_secs(60), MockClock::new()));
    let counter = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let cache = cache.clone();
            let counter = counter.clone();
            tokio::spawn(async move {
                cache.get_or_fetch(move || counting_fetch(&counter, Duration::from_millis(100))).await
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), Ok(Snapshot { level: 72.5, seq: 1 }));
    }

    assert_eq!(counter.load(Ordering::SeqCst), 1);
    let CacheStats { fetches, joins, hits, misses, .. } = cache.stats();
    assert_eq!(fetches, 1);
    assert_eq!(joins + hits, 31);
    assert_eq!(misses, joins + 1);
}

#[tokio::test]
async fn test_freshness_window_follows_the_clock() {
    let clock = MockClock::new();
    let cache: SnapshotCache = SingleFlightCache::with_clock(Duration::from_secs(900), clock.clone());
    let counter = Arc::new(AtomicUsize::new(0));

    let first = cache.get_or_fetch(|| counting_fetch(&counter, Duration::ZERO)).await.unwrap();

    clock.advance(Duration::from_secs(899));
    let cached = cache.get_or_fetch(|| counting_fetch(&counter, Duration::ZERO)).await.unwrap();
    assert_eq!(cached, first);

    clock.advance(Duration::from_secs(1));
    let refreshed = cache.get_or_fetch(|| counting_fetch(&counter, Duration::ZERO)).await.unwrap();
    assert_eq!(refreshed.seq, 2);

    let stats = cache.stats();
    assert_eq!(stats.fetches, 2);
    assert_eq!(stats.hits, 1);
    assert!((stats.hit_rate() - 1.0 / 3.0).abs() < 1e-9);
}

/// Validates that a failed fetch is shared and cached like a value.
///
/// # Test Steps
/// 1. Spawn readers while the fetch is failing
/// 2. Verify they all receive the same error from a single attempt
/// 3. Verify the error is served until the TTL elapses
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_failures_are_shared_and_cached() {
    let clock = MockClock::new();
    let cache: Arc<SnapshotCache> =
        Arc::new(SingleFlightCache::with_clock(Duration::from_secs(30), clock.clone()));
    let attempts = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = cache.clone();
            let attempts = attempts.clone();
            tokio::spawn(async move {
                cache
                    .get_or_fetch(move || async move {
                        attempts.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Err::<Snapshot, _>("upstream 503".to_string())
                    })
                    .await
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), Err("upstream 503".to_string()));
    }
    assert_eq!(attempts.load(Ordering::SeqCst), 1);

    let counter = Arc::new(AtomicUsize::new(0));
    let still_failed = cache.get_or_fetch(|| counting_fetch(&counter, Duration::ZERO)).await;
    assert_eq!(still_failed, Err("upstream 503".to_string()));

    clock.advance(Duration::from_secs(30));
    assert!(cache.get_or_fetch(|| counting_fetch(&counter, Duration::ZERO)).await.is_ok());
    assert_eq!(cache.stats().failures, 1);
}
