//! TTL memoization in front of the retry executor.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::errors::GatewayResult;
use crate::domain::models::{CacheEntry, Envelope};
use crate::domain::ports::{CacheStore, Clock};

/// Response cache with lazy expiry.
///
/// Only envelopes with `success == true` are stored, so a failed call is
/// retried on the next request instead of after the TTL. A store that
/// cannot be reached never fails the call; the fetch runs directly.
#[derive(Clone)]
pub struct ResponseCache {
    store: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    enabled: bool,
}

impl ResponseCache {
    /// Create a cache over `store`, judging freshness with `clock`.
    pub fn new(store: Arc<dyn CacheStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            enabled: true,
        }
    }

    /// A cache that never reads or writes; every call fetches.
    pub fn disabled(store: Arc<dyn CacheStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            enabled: false,
        }
    }

    /// Whether lookups and writes happen at all.
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The clock used for expiry and date-scoped keys.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Return the fresh entry for `key`, or run `fetch` and store its result.
    ///
    /// With `refresh` set the hit check is skipped but a successful result
    /// is still written, renewing the TTL window.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        refresh: bool,
        fetch: F,
    ) -> GatewayResult<Envelope>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = GatewayResult<Envelope>>,
    {
        if !self.enabled {
            return fetch().await;
        }

        if !refresh {
            if let Some(hit) = self.lookup(key).await {
                return Ok(hit);
            }
        }

        let envelope = fetch().await?;
        if envelope.success {
            self.store_entry(key, &envelope, ttl).await;
        } else {
            debug!(key, "not caching unsuccessful envelope");
        }
        Ok(envelope)
    }

    /// Drop the entry for `key`.
    pub async fn invalidate(&self, key: &str) {
        if let Err(err) = self.store.remove(key).await {
            warn!(key, error = %err, "cache invalidation failed");
        }
    }

    async fn lookup(&self, key: &str) -> Option<Envelope> {
        match self.store.get(key).await {
            Ok(Some(entry)) if !entry.is_expired(self.clock.now()) => {
                debug!(key, "cache hit");
                Some(entry.value)
            }
            Ok(Some(_)) => {
                debug!(key, "cache entry expired");
                None
            }
            Ok(None) => {
                debug!(key, "cache miss");
                None
            }
            Err(err) => {
                warn!(key, error = %err, "cache read failed, fetching directly");
                None
            }
        }
    }

    async fn store_entry(&self, key: &str, envelope: &Envelope, ttl: Duration) {
        let entry = CacheEntry::new(key, envelope.clone(), self.clock.now(), ttl);
        if let Err(err) = self.store.put(entry).await {
            warn!(key, error = %err, "cache write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::GatewayError;
    use crate::infrastructure::cache::MokaCacheStore;
    use crate::infrastructure::clock::ManualClock;
    use crate::services::test_support::{noon, upstream, FailingStore};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TTL: Duration = Duration::from_secs(60);

    fn cache() -> (ResponseCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(noon()));
        let cache = ResponseCache::new(Arc::new(MokaCacheStore::new()), clock.clone());
        (cache, clock)
    }

    async fn counted(
        cache: &ResponseCache,
        calls: &AtomicUsize,
        refresh: bool,
        outcome: GatewayResult<Envelope>,
    ) -> GatewayResult<Envelope> {
        cache
            .get_or_fetch("GET /books/status", TTL, refresh, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                outcome
            })
            .await
    }

    #[tokio::test]
    async fn test_hit_within_ttl_fetches_once() {
        let (cache, clock) = cache();
        let calls = AtomicUsize::new(0);

        let first = counted(&cache, &calls, false, Ok(Envelope::ok(json!({"n": 1})))).await;
        clock.advance(Duration::from_secs(59));
        let second = counted(&cache, &calls, false, Ok(Envelope::ok(json!({"n": 2})))).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let (cache, clock) = cache();
        let calls = AtomicUsize::new(0);

        counted(&cache, &calls, false, Ok(Envelope::ok(json!({"n": 1}))))
            .await
            .unwrap();
        clock.advance(TTL);
        let second = counted(&cache, &calls, false, Ok(Envelope::ok(json!({"n": 2}))))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(second.data, Some(json!({"n": 2})));
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let (cache, _clock) = cache();
        let calls = AtomicUsize::new(0);

        assert!(counted(&cache, &calls, false, Err(upstream(503))).await.is_err());
        counted(&cache, &calls, false, Ok(Envelope::failed("maintenance")))
            .await
            .unwrap();
        counted(&cache, &calls, false, Ok(Envelope::ok(json!({}))))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_refresh_skips_hit_but_writes() {
        let (cache, clock) = cache();
        let calls = AtomicUsize::new(0);

        counted(&cache, &calls, false, Ok(Envelope::ok(json!({"n": 1}))))
            .await
            .unwrap();
        clock.advance(Duration::from_secs(50));
        counted(&cache, &calls, true, Ok(Envelope::ok(json!({"n": 2}))))
            .await
            .unwrap();

        // the refreshed entry has a renewed window: 50s past the first
        // write's expiry it is still served
        clock.advance(Duration::from_secs(50));
        let served = counted(&cache, &calls, false, Ok(Envelope::ok(json!({"n": 3}))))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(served.data, Some(json!({"n": 2})));
    }

    #[tokio::test]
    async fn test_store_failure_falls_through_to_fetch() {
        let cache = ResponseCache::new(Arc::new(FailingStore), Arc::new(ManualClock::new(noon())));
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let result = counted(&cache, &calls, false, Ok(Envelope::ok(json!({})))).await;
            assert!(result.is_ok());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_disabled_cache_always_fetches() {
        let cache =
            ResponseCache::disabled(Arc::new(MokaCacheStore::new()), Arc::new(ManualClock::new(noon())));
        let calls = AtomicUsize::new(0);

        counted(&cache, &calls, false, Ok(Envelope::ok(json!({})))).await.unwrap();
        counted(&cache, &calls, false, Ok(Envelope::ok(json!({})))).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let (cache, _clock) = cache();
        let calls = AtomicUsize::new(0);

        counted(&cache, &calls, false, Ok(Envelope::ok(json!({})))).await.unwrap();
        cache.invalidate("GET /books/status").await;
        counted(&cache, &calls, false, Ok(Envelope::ok(json!({})))).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_error_passes_through_unchanged() {
        let (cache, _clock) = cache();
        let result = cache
            .get_or_fetch("k", TTL, false, || async {
                Err(GatewayError::DecodeFailure("bad".to_string()))
            })
            .await;
        assert_eq!(result, Err(GatewayError::DecodeFailure("bad".to_string())));
    }
}
