//! Scripted ports shared by the service unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, TimeZone};

use crate::domain::errors::{CacheError, GatewayError, GatewayResult};
use crate::domain::models::{CacheEntry, Envelope, RequestSpec};
use crate::domain::ports::{CacheStore, Transport};

/// 2024-05-01 12:00:00 +08:00
pub fn noon() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(8 * 3600)
        .unwrap()
        .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .unwrap()
}

pub fn upstream(status: u16) -> GatewayError {
    GatewayError::UpstreamError {
        status,
        message: format!("status {status}"),
    }
}

/// Transport answering from per-path scripts. Once a script runs dry the
/// path's fallback answer repeats; unknown paths answer 404.
#[derive(Default)]
pub struct ScriptedTransport {
    scripts: Mutex<HashMap<String, VecDeque<GatewayResult<Envelope>>>>,
    fallbacks: Mutex<HashMap<String, GatewayResult<Envelope>>>,
    delays: Mutex<HashMap<String, Duration>>,
    calls: Mutex<HashMap<String, usize>>,
    total: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `path` with `outcomes` in order, then repeat the last one.
    pub fn script(self, path: &str, outcomes: Vec<GatewayResult<Envelope>>) -> Self {
        if let Some(last) = outcomes.last().cloned() {
            self.fallbacks.lock().unwrap().insert(path.to_string(), last);
        }
        self.scripts
            .lock()
            .unwrap()
            .insert(path.to_string(), outcomes.into_iter().collect());
        self
    }

    /// Always answer `path` with `outcome`.
    pub fn always(self, path: &str, outcome: GatewayResult<Envelope>) -> Self {
        self.script(path, vec![outcome])
    }

    /// Sleep before answering `path`.
    pub fn delay(self, path: &str, by: Duration) -> Self {
        self.delays.lock().unwrap().insert(path.to_string(), by);
        self
    }

    pub fn calls(&self, path: &str) -> usize {
        self.calls.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, spec: &RequestSpec) -> GatewayResult<Envelope> {
        self.total.fetch_add(1, Ordering::SeqCst);
        *self
            .calls
            .lock()
            .unwrap()
            .entry(spec.path.clone())
            .or_default() += 1;

        let delay = self.delays.lock().unwrap().get(&spec.path).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&spec.path)
            .and_then(VecDeque::pop_front);
        scripted
            .or_else(|| self.fallbacks.lock().unwrap().get(&spec.path).cloned())
            .unwrap_or_else(|| Err(upstream(404)))
    }
}

/// Store whose every operation fails.
pub struct FailingStore;

#[async_trait]
impl CacheStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<CacheEntry>, CacheError> {
        Err(CacheError::Unavailable("store offline".to_string()))
    }

    async fn put(&self, _entry: CacheEntry) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("store offline".to_string()))
    }

    async fn remove(&self, _key: &str) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("store offline".to_string()))
    }
}
