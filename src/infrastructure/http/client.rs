use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client as ReqwestClient, Method};
use tracing::{debug, info, instrument, warn};

use crate::domain::errors::{GatewayError, GatewayResult, TransportFailureKind};
use crate::domain::models::{Envelope, HttpMethod, RequestSpec, UpstreamConfig};
use crate::domain::ports::Transport;

/// Header carrying the static API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
        }
    }
}

/// HTTP transport for the upstream API.
///
/// Provides:
/// - Connection pooling and reuse
/// - API key and JSON content-type on every request
/// - Per-attempt timeout
/// - Status classification into `GatewayError`
#[derive(Clone)]
pub struct HttpTransport {
    http_client: ReqwestClient,
    base_url: String,
    api_key: String,
}

impl HttpTransport {
    /// Create a transport from upstream settings.
    ///
    /// # Errors
    /// Returns `TransportFailure` if the HTTP client cannot be built.
    pub fn new(config: &UpstreamConfig) -> GatewayResult<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.request_timeout().min(Duration::from_secs(5)))
            .pool_max_idle_per_host(10)
            .tcp_nodelay(true)
            .build()
            .map_err(|err| GatewayError::TransportFailure {
                kind: TransportFailureKind::Request,
                message: format!("failed to build HTTP client: {err}"),
            })?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, spec: &RequestSpec) -> String {
        if spec.path.starts_with('/') {
            format!("{}{}", self.base_url, spec.path)
        } else {
            format!("{}/{}", self.base_url, spec.path)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, spec), fields(method = %spec.method, path = %spec.path))]
    async fn execute(&self, spec: &RequestSpec) -> GatewayResult<Envelope> {
        let url = self.url_for(spec);
        let query = spec.query_pairs();

        debug!(url = %url, query = ?query, "Sending upstream request");

        let mut request = self
            .http_client
            .request(spec.method.into(), &url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(header::CONTENT_TYPE, "application/json");

        if !query.is_empty() {
            request = request.query(&query);
        }
        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|err| {
            warn!(error = %err, "Upstream request failed before a response arrived");
            GatewayError::from(err)
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(GatewayError::from)?;

        info!(
            status = status.as_u16(),
            bytes = body.len(),
            "Upstream response received"
        );

        if status.as_u16() >= 400 {
            return Err(GatewayError::from_status(status.as_u16(), &body));
        }

        serde_json::from_slice::<Envelope>(&body).map_err(|err| {
            GatewayError::DecodeFailure(format!("invalid envelope from {}: {err}", spec.path))
        })
    }
}
