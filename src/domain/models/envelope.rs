//! The upstream's `{success, data, message}` response wrapper.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::errors::{GatewayError, GatewayResult};

/// Decoded top-level JSON object returned by every upstream endpoint.
///
/// `data` is only trusted when `success` is true. Endpoints that paginate
/// put a `pagination` object next to `data`; a few legacy endpoints put
/// their payload at the top level instead of under `data`. Both end up
/// in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Upstream success flag
    #[serde(default)]
    pub success: bool,

    /// Endpoint-specific payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Optional human readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Any other top-level fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Envelope {
    /// Successful envelope carrying `data`.
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            extra: Map::new(),
        }
    }

    /// Unsuccessful envelope with a message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            extra: Map::new(),
        }
    }

    /// Extract the trusted payload.
    ///
    /// Falls back to the remaining top-level fields when `data` is absent
    /// but the envelope still carries a payload beside `success`.
    pub fn into_payload(self) -> GatewayResult<Value> {
        if !self.success {
            return Err(reported_failure(self.message.as_deref()));
        }

        match self.data {
            Some(data) => Ok(data),
            None if !self.extra.is_empty() => Ok(Value::Object(self.extra)),
            None => Err(GatewayError::DecodeFailure(
                "envelope has no data".to_string(),
            )),
        }
    }

    /// Extract a paginated payload as `{"data": .., "pagination": ..}`.
    pub fn into_paged_payload(mut self) -> GatewayResult<Value> {
        let pagination = self.extra.remove("pagination").unwrap_or(Value::Null);
        let data = self.into_payload()?;

        let mut page = Map::new();
        page.insert("data".to_string(), data);
        page.insert("pagination".to_string(), pagination);
        Ok(Value::Object(page))
    }

    /// Extract one object from `data` and the other top-level fields.
    ///
    /// An object `data` contributes its fields, overriding top-level ones;
    /// any other `data` value is placed under `list_field`.
    pub fn into_merged_payload(self, list_field: &str) -> GatewayResult<Value> {
        let Self {
            success,
            data,
            message,
            mut extra,
        } = self;
        if !success {
            return Err(reported_failure(message.as_deref()));
        }

        match data {
            Some(Value::Object(fields)) => extra.extend(fields),
            Some(Value::Null) | None => {}
            Some(other) => {
                extra.insert(list_field.to_string(), other);
            }
        }
        Ok(Value::Object(extra))
    }
}

fn reported_failure(message: Option<&str>) -> GatewayError {
    GatewayError::DecodeFailure(format!(
        "upstream reported failure: {}",
        message.unwrap_or("no message")
    ))
}
