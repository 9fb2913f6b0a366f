//! Domain layer for the gateway client
//!
//! This module contains the error taxonomy, the request/response and
//! record models, and the port traits the services depend on.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{CacheError, GatewayError, GatewayResult, TransportFailureKind};
