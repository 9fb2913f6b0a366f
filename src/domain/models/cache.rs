use std::time::Duration;

use chrono::{DateTime, FixedOffset};

use super::envelope::Envelope;

/// A cached upstream response.
///
/// Entries expire lazily: a reader treats an entry as absent once
/// `now >= stored_at + ttl`. Nothing sweeps them proactively.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Cache key the entry was stored under
    pub key: String,
    /// Cached response
    pub value: Envelope,
    /// When the entry was written
    pub stored_at: DateTime<FixedOffset>,
    /// Lifetime from `stored_at`
    pub ttl: Duration,
}

impl CacheEntry {
    /// Create an entry stored at `stored_at`.
    pub fn new(
        key: impl Into<String>,
        value: Envelope,
        stored_at: DateTime<FixedOffset>,
        ttl: Duration,
    ) -> Self {
        Self {
            key: key.into(),
            value,
            stored_at,
            ttl,
        }
    }

    /// Instant after which the entry is stale.
    ///
    /// A TTL too large to represent never expires.
    pub fn expires_at(&self) -> Option<DateTime<FixedOffset>> {
        chrono::Duration::from_std(self.ttl)
            .ok()
            .and_then(|ttl| self.stored_at.checked_add_signed(ttl))
    }

    /// True when the entry must no longer be served at `now`.
    pub fn is_expired(&self, now: DateTime<FixedOffset>) -> bool {
        self.expires_at().is_some_and(|expires_at| now >= expires_at)
    }
}
