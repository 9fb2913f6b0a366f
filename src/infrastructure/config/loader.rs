use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// No upstream base URL
    #[error("Upstream base_url cannot be empty")]
    EmptyBaseUrl,

    /// Base URL without an http(s) scheme
    #[error("Invalid upstream base_url: {0}. Must start with http:// or https://")]
    InvalidBaseUrl(String),

    /// No API key
    #[error("Upstream api_key cannot be empty")]
    EmptyApiKey,

    /// Zero per-attempt timeout
    #[error("Invalid request_timeout_ms: {0}. Must be at least 1")]
    InvalidRequestTimeout(u64),

    /// Zero attempts
    #[error("Invalid max_attempts: {0}. Must be at least 1")]
    InvalidMaxAttempts(u32),

    /// Zero base backoff
    #[error("Invalid base_backoff_ms: {0}. Must be at least 1")]
    InvalidBaseBackoff(u64),

    /// Base backoff above the cap
    #[error(
        "Invalid backoff configuration: base_backoff_ms ({0}) must not exceed max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),

    /// Zero cache capacity
    #[error("Invalid cache max_capacity: {0}. Must be at least 1")]
    InvalidCacheCapacity(u64),

    /// Zero per-unit timeout
    #[error("Invalid aggregator unit_timeout_ms: {0}. Must be at least 1 or unset")]
    InvalidUnitTimeout(u64),

    /// Zero batch deadline
    #[error("Invalid aggregator batch_deadline_ms: {0}. Must be at least 1 or unset")]
    InvalidBatchDeadline(u64),

    /// Unknown log level
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Unknown log format
    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .rsywx/config.yaml (project config)
    /// 3. .rsywx/local.yaml (local overrides, optional)
    /// 4. Environment variables (RSYWX_* prefix, `__` separates sections)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".rsywx/config.yaml"))
            .merge(Yaml::file(".rsywx/local.yaml"))
            .merge(Env::prefixed("RSYWX_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honoring environment overrides
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("RSYWX_").split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.as_ref().display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let upstream = &config.upstream;
        if upstream.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if !(upstream.base_url.starts_with("http://") || upstream.base_url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidBaseUrl(upstream.base_url.clone()));
        }
        if upstream.api_key.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        if upstream.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidRequestTimeout(upstream.request_timeout_ms));
        }

        let retry = &config.retry;
        if retry.max_attempts == 0 {
            return Err(ConfigError::InvalidMaxAttempts(retry.max_attempts));
        }
        if retry.base_backoff_ms == 0 {
            return Err(ConfigError::InvalidBaseBackoff(retry.base_backoff_ms));
        }
        if retry.base_backoff_ms > retry.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                retry.base_backoff_ms,
                retry.max_backoff_ms,
            ));
        }

        if config.cache.max_capacity == 0 {
            return Err(ConfigError::InvalidCacheCapacity(config.cache.max_capacity));
        }

        let aggregator = &config.aggregator;
        if aggregator.unit_timeout_ms == Some(0) {
            return Err(ConfigError::InvalidUnitTimeout(0));
        }
        if aggregator.batch_deadline_ms == Some(0) {
            return Err(ConfigError::InvalidBatchDeadline(0));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}
