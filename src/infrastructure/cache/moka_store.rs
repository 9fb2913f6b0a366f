//! In-process cache store backed by `moka`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;

use crate::domain::errors::CacheError;
use crate::domain::models::CacheEntry;
use crate::domain::ports::CacheStore;

/// Default maximum number of cached responses.
const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// Evicts each entry after its own TTL so memory stays bounded.
///
/// Serving decisions never rely on this; `ResponseCache` checks
/// freshness against its injected clock.
struct EntryTtl;

impl Expiry<String, CacheEntry> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Concurrent TTL cache store.
///
/// `moka` shards its internal locks and never holds them across an
/// await point, so concurrent units never suspend while holding them.
#[derive(Clone)]
pub struct MokaCacheStore {
    entries: Cache<String, CacheEntry>,
}

impl MokaCacheStore {
    /// Create a store with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_CAPACITY)
    }

    /// Create a store holding at most `max_capacity` entries.
    pub fn with_capacity(max_capacity: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(EntryTtl)
            .build();

        Self { entries }
    }

    /// Number of entries currently held (approximate until pending
    /// maintenance runs).
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }
}

impl Default for MokaCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MokaCacheStore {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        Ok(self.entries.get(key).await)
    }

    async fn put(&self, entry: CacheEntry) -> Result<(), CacheError> {
        self.entries.insert(entry.key.clone(), entry).await;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.entries.invalidate(key).await;
        Ok(())
    }
}
