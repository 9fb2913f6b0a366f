//! Transport port - executes one upstream request.

use async_trait::async_trait;

use crate::domain::errors::GatewayResult;
use crate::domain::models::{Envelope, RequestSpec};

/// Executes a single HTTP request against the upstream.
///
/// Implementations hold no state across calls beyond their configuration.
/// Status codes >= 400 map to `GatewayError::UpstreamError`; network
/// failures map to `GatewayError::TransportFailure`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and decode the response envelope.
    async fn execute(&self, spec: &RequestSpec) -> GatewayResult<Envelope>;
}
