//! Wire types of the remote engine's HTTP API.
//!
//! Successful responses are returned either bare or wrapped in a `data`
//! envelope. Failures look like
//! `{"success": false, "error": {"message", "code", "details"}}`, also with
//! or without the envelope, and may arrive with any status code.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::WorkbenchError;

pub const PARSE_PATH: &str = "/api/debug/parse";
pub const TRANSFORM_PATH: &str = "/api/debug/transform";
pub const VERSION_PATH: &str = "/api/version";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<i32>,
    pub rules: String,
    pub logs: String,
}

/// The engine transforms the record kept from the last parse;
/// `parse_result` is sent as an empty object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<i32>,
    pub parse_result: Value,
    pub oml: String,
}

impl TransformRequest {
    pub fn new(connection_id: Option<i32>, oml: impl Into<String>) -> Self {
        Self {
            connection_id,
            parse_result: Value::Object(Default::default()),
            oml: oml.into(),
        }
    }
}

/// One row of a parsed or transformed record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParsedField {
    pub no: u32,
    #[serde(default)]
    pub meta: String,
    pub name: String,
    #[serde(default)]
    pub value: Value,
}

impl ParsedField {
    /// `null` and `""` count as empty.
    pub fn is_empty_value(&self) -> bool {
        match &self.value {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// The value as shown in a table cell.
    pub fn display_value(&self) -> String {
        match &self.value {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordResponse {
    #[serde(default)]
    pub fields: Vec<ParsedField>,
    /// The record rendered as JSON by the engine.
    #[serde(default)]
    pub format_json: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    #[serde(default)]
    pub wp_editer: String,
    #[serde(default)]
    pub warp_engine: String,
}

impl VersionInfo {
    pub fn label(&self) -> String {
        fn or_unknown(v: &str) -> &str {
            if v.is_empty() { "unknown" } else { v }
        }
        format!(
            "wp-editer {} / warp-engine {}",
            or_unknown(&self.wp_editer),
            or_unknown(&self.warp_engine)
        )
    }
}

/// Which remote call a failure belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Parse,
    Transform,
    Version,
}

impl Operation {
    /// Shown when the engine fails without a message.
    pub fn default_message(self) -> &'static str {
        match self {
            Operation::Parse => "parse failed, please retry later",
            Operation::Transform => "transform failed, please retry later",
            Operation::Version => "version lookup failed",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Parse => "parse",
            Operation::Transform => "transform",
            Operation::Version => "version",
        })
    }
}

/// A structured failure reported by the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemoteFailure {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl RemoteFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            details: None,
        }
    }

    /// Read a failure out of a response body, if it is one.
    ///
    /// Missing messages fall back to the operation's default; `details`
    /// falls back to the whole `error` object.
    pub fn from_body(body: &Value, operation: Operation) -> Option<Self> {
        let body = unwrap_envelope(body);
        if body.get("success").and_then(Value::as_bool) != Some(false) {
            return None;
        }
        let error = body.get("error");
        let message = error
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or(operation.default_message())
            .to_string();
        let code = error.and_then(|e| e.get("code")).and_then(|code| match code {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });
        let details = error
            .and_then(|e| e.get("details"))
            .filter(|d| !d.is_null())
            .or(error)
            .cloned();
        Some(Self {
            message,
            code,
            details,
        })
    }
}

impl fmt::Display for RemoteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} (code {code})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Strip a `data` envelope when present.
pub fn unwrap_envelope(body: &Value) -> &Value {
    match body.get("data") {
        Some(inner) if body.is_object() => inner,
        _ => body,
    }
}

/// Decode a response body, turning `success: false` into
/// [`WorkbenchError::Remote`] regardless of `status`.
pub fn decode_response<T: serde::de::DeserializeOwned>(
    status: u16,
    body: &str,
    operation: Operation,
) -> Result<T, WorkbenchError> {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(err) if (200..300).contains(&status) => return Err(WorkbenchError::Decode(err)),
        Err(_) => {
            let mut failure = RemoteFailure::new(operation.default_message());
            failure.code = Some(status.to_string());
            return Err(WorkbenchError::Remote(failure));
        }
    };
    if let Some(failure) = RemoteFailure::from_body(&value, operation) {
        return Err(WorkbenchError::Remote(failure));
    }
    if !(200..300).contains(&status) {
        let mut failure = RemoteFailure::new(operation.default_message());
        failure.code = Some(status.to_string());
        return Err(WorkbenchError::Remote(failure));
    }
    Ok(T::deserialize(unwrap_envelope(&value))?)
}
