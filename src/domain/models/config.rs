use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Main configuration structure for the gateway
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Upstream API connection settings
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Retry policy configuration
    #[serde(default)]
    pub retry: RetryConfig,

    /// Response cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Batch fan-out configuration
    #[serde(default)]
    pub aggregator: AggregatorConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Upstream API connection settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UpstreamConfig {
    /// Base URL every endpoint path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Static API key sent as `X-API-Key` on every request
    #[serde(default)]
    pub api_key: String,

    /// Per-attempt request timeout in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://api".to_string()
}

const fn default_request_timeout_ms() -> u64 {
    10_000
}

impl UpstreamConfig {
    /// Per-attempt timeout as a `Duration`
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

// The API key never reaches logs through `{:?}`.
impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("request_timeout_ms", &self.request_timeout_ms)
            .finish()
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the second attempt in milliseconds; doubles afterwards
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,

    /// Upper bound for a single backoff delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Randomize delays by +/-50%
    #[serde(default)]
    pub jitter: bool,
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_base_backoff_ms() -> u64 {
    100
}

const fn default_max_backoff_ms() -> u64 {
    5_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_backoff_ms: default_base_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            jitter: false,
        }
    }
}

/// Response cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CacheConfig {
    /// Disable to send every call upstream
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// TTL for operations without a more specific lifetime, in seconds
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,

    /// TTL for frequently changing lists, in seconds
    #[serde(default = "default_list_ttl_secs")]
    pub list_ttl_secs: u64,

    /// Maximum number of cached responses
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

const fn default_true() -> bool {
    true
}

const fn default_ttl_secs() -> u64 {
    300
}

const fn default_list_ttl_secs() -> u64 {
    120
}

const fn default_max_capacity() -> u64 {
    10_000
}

impl CacheConfig {
    /// Default TTL as a `Duration`
    pub const fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    /// List TTL as a `Duration`
    pub const fn list_ttl(&self) -> Duration {
        Duration::from_secs(self.list_ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_ttl_secs: default_ttl_secs(),
            list_ttl_secs: default_list_ttl_secs(),
            max_capacity: default_max_capacity(),
        }
    }
}

/// Batch fan-out configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AggregatorConfig {
    /// Upper bound for one unit of work (all attempts included), in milliseconds
    #[serde(default = "default_unit_timeout_ms")]
    pub unit_timeout_ms: Option<u64>,

    /// Upper bound for a whole batch, in milliseconds
    #[serde(default)]
    pub batch_deadline_ms: Option<u64>,
}

#[allow(clippy::unnecessary_wraps)]
const fn default_unit_timeout_ms() -> Option<u64> {
    Some(30_000)
}

impl AggregatorConfig {
    /// Per-unit timeout as a `Duration`
    pub fn unit_timeout(&self) -> Option<Duration> {
        self.unit_timeout_ms.map(Duration::from_millis)
    }

    /// Batch deadline as a `Duration`
    pub fn batch_deadline(&self) -> Option<Duration> {
        self.batch_deadline_ms.map(Duration::from_millis)
    }
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            unit_timeout_ms: default_unit_timeout_ms(),
            batch_deadline_ms: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for log files; stdout only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// File rotation policy
    #[serde(default)]
    pub rotation: RotationPolicy,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: RotationPolicy::default(),
        }
    }
}

/// Log file rotation policy
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    /// New file every day
    #[default]
    Daily,
    /// New file every hour
    Hourly,
    /// Single file
    Never,
}
