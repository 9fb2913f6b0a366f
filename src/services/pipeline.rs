//! Cache -> retry -> transport pipeline for one request.

use std::time::Duration;

use crate::domain::errors::GatewayResult;
use crate::domain::models::{CachePolicy, Envelope, RequestSpec};
use crate::services::cache_layer::ResponseCache;
use crate::services::retry::RetryExecutor;

/// Shortest lifetime given to a date-scoped entry.
const MIN_DAILY_TTL: Duration = Duration::from_secs(1);

/// Runs a request through the response cache and the retry executor,
/// honoring the request's `CachePolicy`.
#[derive(Clone)]
pub struct RequestPipeline {
    cache: ResponseCache,
    retry: RetryExecutor,
    default_ttl: Duration,
}

impl RequestPipeline {
    /// Create a pipeline. `default_ttl` applies to `CachePolicy::Default`.
    pub const fn new(cache: ResponseCache, retry: RetryExecutor, default_ttl: Duration) -> Self {
        Self {
            cache,
            retry,
            default_ttl,
        }
    }

    /// The response cache in front of the executor.
    pub const fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Cache key and lifetime for `spec`, or `None` when it bypasses the
    /// cache.
    ///
    /// Daily entries carry the local date in their key so a new day never
    /// sees the previous day's entry, and expire at the next local midnight.
    pub fn cache_slot(&self, spec: &RequestSpec) -> Option<(String, Duration)> {
        match spec.cache {
            CachePolicy::Bypass => None,
            CachePolicy::Default => Some((spec.cache_key(), self.default_ttl)),
            CachePolicy::Ttl(ttl) => Some((spec.cache_key(), ttl)),
            CachePolicy::Daily => {
                let clock = self.cache.clock();
                let key = format!("{}@{}", spec.cache_key(), clock.today().format("%Y-%m-%d"));
                Some((key, clock.until_midnight().max(MIN_DAILY_TTL)))
            }
        }
    }

    /// Execute `spec`.
    pub async fn run(&self, spec: &RequestSpec) -> GatewayResult<Envelope> {
        match self.cache_slot(spec) {
            None => self.retry.execute_with_retry(spec).await,
            Some((key, ttl)) => {
                self.cache
                    .get_or_fetch(&key, ttl, spec.is_refresh(), || {
                        self.retry.execute_with_retry(spec)
                    })
                    .await
            }
        }
    }
}
