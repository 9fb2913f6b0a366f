//! Error taxonomy for the gateway client.

use std::time::Duration;

use thiserror::Error;

/// Maximum number of body characters carried into an upstream error message.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Why a request never produced an HTTP response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailureKind {
    /// Connection refused, DNS failure, TLS handshake failure.
    Connect,
    /// The attempt, the unit, or the whole batch ran out of time.
    Timeout,
    /// Any other failure while sending the request or reading the body.
    Request,
}

/// Errors produced by the gateway pipeline.
///
/// Values are `Clone` so a batch can hold them in its result map and the
/// retry executor can surface the last failure unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// Network-level failure (connection, DNS, timeout).
    #[error("Transport failure ({kind:?}): {message}")]
    TransportFailure {
        /// Failure class
        kind: TransportFailureKind,
        /// Human readable cause
        message: String,
    },

    /// Upstream answered with an HTTP status >= 400.
    #[error("Upstream error ({status}): {message}")]
    UpstreamError {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response body
        message: String,
    },

    /// Payload was malformed or incompatible with the expected record.
    #[error("Decode failure: {0}")]
    DecodeFailure(String),

    /// The cache store could not be reached.
    #[error("Cache failure: {0}")]
    CacheFailure(String),

    /// The request could not be built from the caller's arguments.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Convenience alias used across the crate.
pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    /// Build a timeout failure.
    pub fn timeout(after: Duration) -> Self {
        Self::TransportFailure {
            kind: TransportFailureKind::Timeout,
            message: format!("timed out after {}ms", after.as_millis()),
        }
    }

    /// Build an upstream error from a status code and raw response body.
    ///
    /// Prefers the envelope's `message` field when the body is JSON.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| {
                String::from_utf8_lossy(body)
                    .chars()
                    .take(MAX_ERROR_BODY_CHARS)
                    .collect()
            });

        Self::UpstreamError { status, message }
    }

    /// Returns true if another attempt could succeed.
    ///
    /// Network failures and 5xx responses are transient; 4xx responses,
    /// decode, cache and invalid-request failures are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::TransportFailure { .. } => true,
            Self::UpstreamError { status, .. } => *status >= 500,
            Self::DecodeFailure(_) | Self::CacheFailure(_) | Self::InvalidRequest(_) => false,
        }
    }

    /// Returns true if this failure must not be retried.
    pub fn is_terminal(&self) -> bool {
        !self.is_retryable()
    }

    /// Returns true for timeout failures.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::TransportFailure {
                kind: TransportFailureKind::Timeout,
                ..
            }
        )
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportFailureKind::Timeout
        } else if err.is_connect() {
            TransportFailureKind::Connect
        } else {
            TransportFailureKind::Request
        };

        Self::TransportFailure {
            kind,
            message: err.to_string(),
        }
    }
}

/// Failures of the cache backing store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    /// The store did not answer.
    #[error("Cache store unavailable: {0}")]
    Unavailable(String),
}

impl From<CacheError> for GatewayError {
    fn from(err: CacheError) -> Self {
        Self::CacheFailure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(GatewayError::timeout(Duration::from_secs(1)).is_retryable());
        assert!(GatewayError::UpstreamError {
            status: 503,
            message: "unavailable".to_string()
        }
        .is_retryable());
        assert!(GatewayError::UpstreamError {
            status: 500,
            message: String::new()
        }
        .is_retryable());
    }

    #[test]
    fn test_terminal_errors() {
        assert!(GatewayError::UpstreamError {
            status: 404,
            message: "missing".to_string()
        }
        .is_terminal());
        assert!(GatewayError::UpstreamError {
            status: 499,
            message: String::new()
        }
        .is_terminal());
        assert!(GatewayError::DecodeFailure("bad".to_string()).is_terminal());
        assert!(GatewayError::CacheFailure("down".to_string()).is_terminal());
        assert!(GatewayError::InvalidRequest("..".to_string()).is_terminal());
    }

    #[test]
    fn test_from_status_prefers_envelope_message() {
        let err = GatewayError::from_status(422, br#"{"success":false,"message":"bad tags"}"#);
        assert_eq!(
            err,
            GatewayError::UpstreamError {
                status: 422,
                message: "bad tags".to_string()
            }
        );
    }

    #[test]
    fn test_from_status_truncates_plain_body() {
        let body = "x".repeat(500);
        let GatewayError::UpstreamError { message, .. } =
            GatewayError::from_status(500, body.as_bytes())
        else {
            panic!("expected upstream error");
        };
        assert_eq!(message.len(), MAX_ERROR_BODY_CHARS);
    }

    #[test]
    fn test_timeout_classification() {
        let err = GatewayError::timeout(Duration::from_millis(250));
        assert!(err.is_timeout());
        assert!(err.to_string().contains("250ms"));
        assert!(!GatewayError::DecodeFailure("x".to_string()).is_timeout());
    }
}
