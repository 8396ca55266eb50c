//! Response envelope: application error, not-implemented placeholder, or data.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::FetchError;

/// A successfully transported response.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    Data(T),
    /// `{status: "not_implemented", message}`. Shown as a placeholder, not an error.
    NotImplemented(String),
}

impl<T> Envelope<T> {
    pub fn data(self) -> Option<T> {
        match self {
            Envelope::Data(d) => Some(d),
            Envelope::NotImplemented(_) => None,
        }
    }
}

/// Non-empty `error` field, if any. `null`, `false` and `""` do not count.
fn application_error(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Decode a response body. The `error` field wins over `status`.
///
/// An empty body (`null`) decodes as `{}`, so every field takes its default.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<Envelope<T>, FetchError> {
    if let Some(msg) = application_error(&value) {
        return Err(FetchError::Application(msg));
    }
    if value.get("status").and_then(Value::as_str) == Some("not_implemented") {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        return Ok(Envelope::NotImplemented(message));
    }
    let value = if value.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        value
    };
    Ok(Envelope::Data(serde_json::from_value(value)?))
}
