//! Common test utilities for integration tests
//!
//! Provides a mock upstream and a client wired to it.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, TimeZone};
use rsywx_gateway::{Config, GatewayClient, HttpTransport, ManualClock, MokaCacheStore};
use serde_json::{json, Value};
use wiremock::MockServer;

/// API key the mock upstream expects.
pub const API_KEY: &str = "test-key";

/// 2024-05-01 12:00:00 +08:00
pub fn noon() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(8 * 3600)
        .unwrap()
        .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .unwrap()
}

/// Configuration pointing at `server` with fast retries.
pub fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.upstream.base_url = server.uri();
    config.upstream.api_key = API_KEY.to_string();
    config.upstream.request_timeout_ms = 2_000;
    config.retry.base_backoff_ms = 10;
    config.retry.max_backoff_ms = 50;
    config
}

/// Client over a real HTTP transport, an in-process cache and a manual clock.
pub fn client_for(config: &Config) -> (GatewayClient, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(noon()));
    let transport = HttpTransport::new(&config.upstream).unwrap();
    let client = GatewayClient::with_components(
        Arc::new(transport),
        Arc::new(MokaCacheStore::new()),
        clock.clone(),
        config,
    );
    (client, clock)
}

/// Successful envelope around `data`.
pub fn ok(data: Value) -> Value {
    json!({ "success": true, "data": data })
}

/// Minimal valid book.
pub fn book(id: i64) -> Value {
    json!({ "id": id, "bookid": format!("{id:05}"), "title": format!("Book {id}") })
}
