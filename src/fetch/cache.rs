//! Time-bounded response cache keyed by URL.
//!
//! Within the TTL a page is served from memory, so repeated pipeline runs
//! inside the validity window cost no network calls (and bypass rate
//! limiting entirely). Failures are never cached: a fetch that errors can
//! be retried immediately on the next call.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::error::FetchError;

/// A cached response body with its insertion and recency bookkeeping.
struct CacheEntry {
    body: String,
    inserted_at: Instant,
    last_used: u64,
}

/// Interior state: the entries plus a monotonic recency counter.
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    tick: u64,
}

/// TTL cache with a bounded entry count and least-recently-used eviction.
///
/// The mutex is held across the miss-path fetch, so concurrent callers are
/// serialized (single writer at a time) and two simultaneous misses for the
/// same key cannot double-fetch.
pub struct FetchCache {
    ttl: Duration,
    capacity: usize,
    state: Mutex<CacheState>,
}

impl FetchCache {
    /// Create a cache holding at most `capacity` entries, each valid for `ttl`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be > 0");
        Self {
            ttl,
            capacity,
            state: Mutex::new(CacheState {
                entries: HashMap::with_capacity(capacity),
                tick: 0,
            }),
        }
    }

    /// Return the cached body for `key`, or run `fetch_fn` and cache its result.
    ///
    /// `fetch_fn` is only invoked on a miss (no entry, or the entry expired).
    /// A successful fetch is stored; an error is returned as-is without
    /// being cached, so the next call retries.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch_fn: F) -> Result<String, FetchError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, FetchError>>,
    {
        let mut state = self.state.lock().await;
        state.tick += 1;
        let tick = state.tick;

        if let Some(entry) = state.entries.get_mut(key) {
            if entry.inserted_at.elapsed() < self.ttl {
                entry.last_used = tick;
                debug!(url = %key, "cache hit");
                return Ok(entry.body.clone());
            }
            debug!(url = %key, "cache entry expired");
            state.entries.remove(key);
        }

        let body = fetch_fn().await?;

        Self::make_room(&mut state, self.capacity, self.ttl);
        state.entries.insert(
            key.to_string(),
            CacheEntry {
                body: body.clone(),
                inserted_at: Instant::now(),
                last_used: tick,
            },
        );
        debug!(url = %key, bytes = body.len(), "cached fetched body");

        Ok(body)
    }

    /// Number of live (non-expired) entries.
    pub async fn len(&self) -> usize {
        let mut state = self.state.lock().await;
        let ttl = self.ttl;
        let now = Instant::now();
        state
            .entries
            .retain(|_, entry| now.duration_since(entry.inserted_at) < ttl);
        state.entries.len()
    }

    /// Whether the cache currently holds no live entries.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop expired entries, then evict the least-recently-used entry if the
    /// cache is still at capacity. Called before every insert, so the entry
    /// count never exceeds `capacity`.
    fn make_room(state: &mut CacheState, capacity: usize, ttl: Duration) {
        let now = Instant::now();
        state
            .entries
            .retain(|_, entry| now.duration_since(entry.inserted_at) < ttl);

        if state.entries.len() >= capacity {
            let lru_key = state
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone());
            if let Some(key) = lru_key {
                debug!(url = %key, "evicting least-recently-used cache entry");
                state.entries.remove(&key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_fetch(
        calls: &Arc<AtomicUsize>,
        body: &str,
    ) -> impl Future<Output = Result<String, FetchError>> {
        let calls = Arc::clone(calls);
        let body = body.to_string();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(body)
        }
    }

    #[tokio::test]
    async fn test_second_call_within_ttl_is_served_from_cache() {
        let cache = FetchCache::new(Duration::from_secs(3600), 100);
        let calls = Arc::new(AtomicUsize::new(0));

        let first = cache
            .get_or_fetch("https://example.com", || counting_fetch(&calls, "body"))
            .await
            .unwrap();
        let second = cache
            .get_or_fetch("https://example.com", || counting_fetch(&calls, "other"))
            .await
            .unwrap();

        assert_eq!(first, "body");
        assert_eq!(second, "body");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_is_fetched_again() {
        let cache = FetchCache::new(Duration::from_millis(100), 100);
        let calls = Arc::new(AtomicUsize::new(0));

        cache
            .get_or_fetch("https://example.com", || counting_fetch(&calls, "body"))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        let refreshed = cache
            .get_or_fetch("https://example.com", || counting_fetch(&calls, "fresh"))
            .await
            .unwrap();

        assert_eq!(refreshed, "fresh");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let cache = FetchCache::new(Duration::from_secs(3600), 100);
        let calls = Arc::new(AtomicUsize::new(0));

        let failed = cache
            .get_or_fetch("https://example.com", || {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(FetchError::Unavailable("503".to_string()))
                }
            })
            .await;
        assert!(failed.is_err());

        let retried = cache
            .get_or_fetch("https://example.com", || counting_fetch(&calls, "body"))
            .await
            .unwrap();

        assert_eq!(retried, "body");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_least_recently_used_entry_is_evicted_at_capacity() {
        let cache = FetchCache::new(Duration::from_secs(3600), 2);
        let calls = Arc::new(AtomicUsize::new(0));

        cache
            .get_or_fetch("a", || counting_fetch(&calls, "a-body"))
            .await
            .unwrap();
        cache
            .get_or_fetch("b", || counting_fetch(&calls, "b-body"))
            .await
            .unwrap();
        // Touch "a" so "b" becomes the least recently used.
        cache
            .get_or_fetch("a", || counting_fetch(&calls, "unused"))
            .await
            .unwrap();
        // Inserting "c" at capacity evicts "b".
        cache
            .get_or_fetch("c", || counting_fetch(&calls, "c-body"))
            .await
            .unwrap();
        assert_eq!(cache.len().await, 2);

        // "a" survived the eviction: still a hit, no new fetch.
        let a = cache
            .get_or_fetch("a", || counting_fetch(&calls, "unused"))
            .await
            .unwrap();
        assert_eq!(a, "a-body");
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        // "b" did not: looking it up again goes back to the network.
        cache
            .get_or_fetch("b", || counting_fetch(&calls, "b-again"))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(cache.len().await, 2);
    }

    #[test]
    #[should_panic(expected = "capacity must be > 0")]
    fn test_zero_capacity_is_rejected() {
        let _ = FetchCache::new(Duration::from_secs(3600), 0);
    }
}
