//! Single-flight cache with time-to-live.
//!
//! Holds exactly one entry: the outcome (value *or* error) of the last fetch
//! together with the instant it completed. A read that finds the entry fresh
//! returns it without fetching. A stale read starts a fetch unless one is
//! already running, in which case it joins that fetch. Every caller that
//! overlaps a fetch observes the same outcome.

use std::future::Future;
use std::time::{Duration, Instant};

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tracing::{debug, trace};

use super::stats::{CacheStats, MetricsCollector};
use crate::time::{Clock, SystemClock};

type SharedFetch<V, E> = Shared<BoxFuture<'static, Result<V, E>>>;

struct CacheEntry<V, E> {
    outcome: Result<V, E>,
    fetched_at: Instant,
}

struct InFlight<V, E> {
    generation: u64,
    future: SharedFetch<V, E>,
}

struct State<V, E> {
    entry: Option<CacheEntry<V, E>>,
    in_flight: Option<InFlight<V, E>>,
    generation: u64,
}

/// Single-flight, time-to-live cache around one expensive fetch.
///
/// Generic over the fetched value, the error and the clock. Both `V` and `E`
/// must be `Clone` because one outcome is handed to many callers.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use fleetlink_common::cache::SingleFlightCache;
///
/// # tokio_test::block_on(async {
/// let cache: SingleFlightCache<u32, String> = SingleFlightCache::new(Duration::from_secs(60));
///
/// let first = cache.get_or_fetch(|| async { Ok(7) }).await;
/// let second = cache.get_or_fetch(|| async { Ok(8) }).await;
///
/// assert_eq!(first, Ok(7));
/// assert_eq!(second, Ok(7)); // still fresh, no second fetch
/// assert_eq!(cache.stats().fetches, 1);
/// # });
/// ```
pub struct SingleFlightCache<V, E, C = SystemClock>
where
    C: Clock,
{
    state: Mutex<State<V, E>>,
    ttl: Duration,
    clock: C,
    metrics: MetricsCollector,
}

impl<V, E> SingleFlightCache<V, E, SystemClock>
where
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Creates a cache backed by the system clock.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl<V, E, C> SingleFlightCache<V, E, C>
where
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
    C: Clock,
{
    /// Creates a cache with a custom clock.
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self {
            state: Mutex::new(State { entry: None, in_flight: None, generation: 0 }),
            ttl,
            clock,
            metrics: MetricsCollector::default(),
        }
    }

    /// Returns the cached outcome if fresh, otherwise runs or joins a fetch.
    ///
    /// `fetch` is only invoked when this caller becomes the leader of a new
    /// fetch. The fetch future is driven by whichever participant polls it;
    /// if the leader is dropped, joiners still complete it.
    ///
    /// # Errors
    /// Returns the error produced by the fetch that this call observed,
    /// whether it ran now or was cached within the TTL.
    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let (generation, flight) = {
            let mut state = self.state.lock();

            if let Some(entry) = state.entry.as_ref() {
                if self.is_fresh(entry) {
                    self.metrics.record_hit();
                    trace!("single-flight cache hit");
                    return entry.outcome.clone();
                }
            }

            self.metrics.record_miss();

            if let Some(in_flight) = state.in_flight.as_ref() {
                self.metrics.record_join();
                debug!(generation = in_flight.generation, "joining in-flight fetch");
                (in_flight.generation, in_flight.future.clone())
            } else {
                state.generation += 1;
                let generation = state.generation;
                let future = fetch().boxed().shared();
                state.in_flight = Some(InFlight { generation, future: future.clone() });
                self.metrics.record_fetch();
                debug!(generation, "starting fetch");
                (generation, future)
            }
        };

        let outcome = flight.await;
        self.complete(generation, &outcome);
        outcome
    }

    /// Drops the cached entry so the next read fetches again.
    ///
    /// A fetch already in flight is unaffected and will repopulate the entry.
    pub fn invalidate(&self) {
        self.state.lock().entry = None;
    }

    /// Whether a fetch is currently running.
    #[must_use]
    pub fn is_fetching(&self) -> bool {
        self.state.lock().in_flight.is_some()
    }

    /// Configured time-to-live.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get current statistics snapshot
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.metrics.snapshot()
    }

    fn is_fresh(&self, entry: &CacheEntry<V, E>) -> bool {
        self.clock.now().saturating_duration_since(entry.fetched_at) < self.ttl
    }

    /// Stores the outcome of `generation`, once, and clears the in-flight
    /// marker. Later participants of the same generation find it cleared.
    fn complete(&self, generation: u64, outcome: &Result<V, E>) {
        let mut state = self.state.lock();
        let owns_flight = state.in_flight.as_ref().is_some_and(|f| f.generation == generation);
        if !owns_flight {
            return;
        }

        state.in_flight = None;
        if outcome.is_err() {
            self.metrics.record_failure();
        }
        state.entry = Some(CacheEntry { outcome: outcome.clone(), fetched_at: self.clock.now() });
    }
}
