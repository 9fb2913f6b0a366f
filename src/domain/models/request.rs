//! Request specifications submitted to the gateway.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query parameter name the upstream uses to skip its own cache.
pub const REFRESH_PARAM: &str = "refresh";

/// HTTP verbs the upstream accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// Read
    Get,
    /// Write
    Post,
}

impl HttpMethod {
    /// Upper-case verb as sent on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar query parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    /// Serialized as the literal `true` / `false`
    Bool(bool),
    /// Integer
    Int(i64),
    /// Float
    Float(f64),
    /// Text
    Text(String),
}

impl QueryValue {
    /// Wire representation of the value.
    pub fn to_query_string(&self) -> String {
        match self {
            Self::Bool(flag) => String::from(if *flag { "true" } else { "false" }),
            Self::Int(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// How the response of a request is cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Cache with the configured default TTL.
    #[default]
    Default,
    /// Cache with an explicit TTL.
    Ttl(Duration),
    /// Key the entry by the local calendar date so it turns over at midnight.
    Daily,
    /// Non-deterministic or mutating request; never read or written.
    Bypass,
}

/// One logical upstream call.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    /// HTTP verb
    pub method: HttpMethod,
    /// Endpoint path relative to the base URL, starting with `/`
    pub path: String,
    /// Query parameters, kept sorted for stable cache keys
    pub query: BTreeMap<String, QueryValue>,
    /// Optional JSON body
    pub body: Option<Value>,
    /// Cache directive
    pub cache: CachePolicy,
}

impl RequestSpec {
    /// Build a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            query: BTreeMap::new(),
            body: None,
            cache: CachePolicy::Default,
        }
    }

    /// Build a POST request. POSTs bypass the cache.
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            query: BTreeMap::new(),
            body: Some(body),
            cache: CachePolicy::Bypass,
        }
    }

    /// Add a query parameter.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Forward the `refresh` flag to the upstream and force a cache refresh.
    #[must_use]
    pub fn with_refresh(self, refresh: bool) -> Self {
        self.with_query(REFRESH_PARAM, refresh)
    }

    /// Override the cache directive.
    #[must_use]
    pub const fn with_cache(mut self, cache: CachePolicy) -> Self {
        self.cache = cache;
        self
    }

    /// True when the caller asked to skip cached data.
    pub fn is_refresh(&self) -> bool {
        matches!(self.query.get(REFRESH_PARAM), Some(QueryValue::Bool(true)))
    }

    /// Query parameters in wire form.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.query
            .iter()
            .map(|(name, value)| (name.clone(), value.to_query_string()))
            .collect()
    }

    /// Cache key for this request: verb, path and every query parameter
    /// except `refresh`, which changes freshness but not identity.
    pub fn cache_key(&self) -> String {
        let mut key = format!("{} {}", self.method, self.path);
        let params: Vec<String> = self
            .query
            .iter()
            .filter(|(name, _)| name.as_str() != REFRESH_PARAM)
            .map(|(name, value)| format!("{name}={}", value.to_query_string()))
            .collect();

        if !params.is_empty() {
            key.push('?');
            key.push_str(&params.join("&"));
        }
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bool_query_values_are_literal_strings() {
        let spec = RequestSpec::get("/books/status")
            .with_refresh(false)
            .with_query("instock", true);
        assert_eq!(
            spec.query_pairs(),
            vec![
                ("instock".to_string(), "true".to_string()),
                ("refresh".to_string(), "false".to_string()),
            ]
        );
    }

    #[test]
    fn test_cache_key_ignores_refresh() {
        let plain = RequestSpec::get("/books/last_visited").with_query("count", 5_u32);
        let refreshed = plain.clone().with_refresh(true);
        assert_eq!(plain.cache_key(), refreshed.cache_key());
        assert_eq!(plain.cache_key(), "GET /books/last_visited?count=5");
        assert!(refreshed.is_refresh());
        assert!(!plain.is_refresh());
    }

    #[test]
    fn test_cache_key_is_order_independent() {
        let a = RequestSpec::get("/x").with_query("b", 2_u32).with_query("a", 1_u32);
        let b = RequestSpec::get("/x").with_query("a", 1_u32).with_query("b", 2_u32);
        assert_eq!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn test_post_bypasses_cache() {
        let spec = RequestSpec::post("/books/42/tags", json!({"tags": ["scifi"]}));
        assert_eq!(spec.method, HttpMethod::Post);
        assert_eq!(spec.cache, CachePolicy::Bypass);
        assert_eq!(spec.cache_key(), "POST /books/42/tags");
    }
}
