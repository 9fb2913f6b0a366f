//! Field decoders for upstream payloads.
//!
//! The upstream serializes numbers as strings in places, sends `null` for
//! absent values and grows its schemas additively. Optional fields decode
//! to their defaults; identity fields must be present and non-empty.

use serde::de::{DeserializeOwned, Error};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[allow(clippy::cast_possible_truncation)]
fn to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    }
}

fn to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Integer that may arrive as a string; `null` becomes 0.
pub fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(0);
    }
    to_i64(&value).ok_or_else(|| D::Error::custom(format!("expected integer, got {}", describe(&value))))
}

/// Optional integer that may arrive as a string.
pub fn lenient_opt_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    to_i64(&value)
        .map(Some)
        .ok_or_else(|| D::Error::custom(format!("expected integer, got {}", describe(&value))))
}

/// Float that may arrive as a string; `null` becomes 0.0.
pub fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(0.0);
    }
    to_f64(&value).ok_or_else(|| D::Error::custom(format!("expected number, got {}", describe(&value))))
}

/// Text; numbers are stringified and `null` becomes empty.
pub fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(String::new());
    }
    to_text(&value).ok_or_else(|| D::Error::custom(format!("expected string, got {}", describe(&value))))
}

/// Optional text; empty strings become `None`.
pub fn lenient_opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    to_text(&value)
        .map(|s| Some(s).filter(|s| !s.is_empty()))
        .ok_or_else(|| D::Error::custom(format!("expected string, got {}", describe(&value))))
}

/// Boolean that may arrive as 0/1 or as text.
pub fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes"),
        _ => false,
    })
}

/// List where `null` means empty.
pub fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(value).map_err(D::Error::custom)
}

/// Nested object where `null` means its default.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(value).map_err(D::Error::custom)
}

/// Identity integer: must be present and not `null`.
pub fn required_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    to_i64(&value).ok_or_else(|| {
        D::Error::custom(format!("identity field must be an integer, got {}", describe(&value)))
    })
}

/// Identity text: must be present, not `null` and not blank.
pub fn required_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    match to_text(&value) {
        Some(text) if !text.trim().is_empty() => Ok(text),
        Some(_) => Err(D::Error::custom("identity field must not be empty")),
        None => Err(D::Error::custom(format!(
            "identity field must be a string, got {}",
            describe(&value)
        ))),
    }
}
