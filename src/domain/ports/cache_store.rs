//! Cache store port - backing storage for the response cache.

use async_trait::async_trait;

use crate::domain::errors::CacheError;
use crate::domain::models::CacheEntry;

/// Key/value storage for cached responses.
///
/// Must be safe under concurrent reads and writes of the same key. The
/// store does not judge freshness; callers compare `CacheEntry::stored_at`
/// and `ttl` against their own clock.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Look up an entry.
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError>;

    /// Insert or replace an entry.
    async fn put(&self, entry: CacheEntry) -> Result<(), CacheError>;

    /// Remove an entry if present.
    async fn remove(&self, key: &str) -> Result<(), CacheError>;
}
