//! Infrastructure layer module
//!
//! This module contains the adapters behind the domain ports:
//! - HTTP transport to the upstream (reqwest)
//! - In-process response cache store (moka)
//! - System and manual clocks
//! - Configuration management (figment)
//! - Logging infrastructure (tracing)
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod cache;
pub mod clock;
pub mod config;
pub mod http;
pub mod logging;
