//! Single-flight TTL cache
//!
//! One cached outcome per cache instance, refreshed at most once per TTL
//! window, with overlapping callers collapsed onto a single fetch.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use fleetlink_common::cache::SingleFlightCache;
//!
//! # tokio_test::block_on(async {
//! let cache: SingleFlightCache<String, String> = SingleFlightCache::new(Duration::from_secs(900));
//! let value = cache.get_or_fetch(|| async { Ok("snapshot".to_string()) }).await;
//! assert_eq!(value.as_deref(), Ok("snapshot"));
//! # });
//! ```

pub mod single_flight;
pub mod stats;

pub use single_flight::SingleFlightCache;
pub use stats::CacheStats;
