//! JSON-RPC request and response envelopes.
//!
//! NZBGet speaks a fixed JSON-RPC dialect: the request carries `method`, a
//! positional `params` array and an `id`; the response carries either
//! `result` or `error`. There is no `jsonrpc` version member and named
//! parameters are never used.

use std::fmt;

use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::ser::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Maximum number of characters of a response body kept for diagnostics.
pub const MAX_ERROR_BODY_CHARS: usize = 1000;

/// Outgoing request envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcRequest {
    pub method: String,
    /// Always a JSON array.
    pub params: Value,
    pub id: u64,
}

impl JsonRpcRequest {
    /// Build a request from a method name and a positional argument list.
    ///
    /// `params` must serialize to a JSON array; tuples, arrays and `Vec`s
    /// do. The unit value `()` is accepted as an empty argument list.
    ///
    /// # Errors
    ///
    /// Fails if the method name is empty, if an argument cannot be
    /// serialized, or if `params` serializes to anything but an array.
    pub fn new<P: Serialize>(method: &str, params: P, id: u64) -> Result<Self, serde_json::Error> {
        if method.is_empty() {
            return Err(serde_json::Error::custom("method name must not be empty"));
        }

        let params = match serde_json::to_value(params)? {
            Value::Null => Value::Array(Vec::new()),
            array @ Value::Array(_) => array,
            other => {
                return Err(serde_json::Error::custom(format!(
                    "params must be a positional array, got {}",
                    json_type_name(&other)
                )))
            }
        };

        Ok(Self {
            method: method.to_string(),
            params,
            id,
        })
    }

    /// Serialize the envelope for the request body.
    pub fn to_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// Incoming response envelope.
///
/// Only a JSON object is accepted; arrays and scalars are rejected rather
/// than read positionally. Absent members decode as `null`. The `id` is kept
/// but not checked, since each HTTP exchange carries exactly one call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonRpcResponse {
    pub result: Value,
    pub error: Value,
    pub id: Value,
}

impl<'de> Deserialize<'de> for JsonRpcResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ResponseVisitor;

        impl<'de> Visitor<'de> for ResponseVisitor {
            type Value = JsonRpcResponse;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON-RPC response object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut response = JsonRpcResponse::default();
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "result" => response.result = map.next_value()?,
                        "error" => response.error = map.next_value()?,
                        "id" => response.id = map.next_value()?,
                        _ => {
                            map.next_value::<IgnoredAny>()?;
                        }
                    }
                }
                Ok(response)
            }
        }

        deserializer.deserialize_map(ResponseVisitor)
    }
}

impl JsonRpcResponse {
    /// The server-supplied error, if the call was rejected.
    pub fn error(&self) -> Option<JsonRpcError> {
        if self.error.is_null() {
            None
        } else {
            Some(JsonRpcError::from_value(&self.error))
        }
    }
}

/// A server-side error object.
///
/// NZBGet sends `{"name": "JSONRPCError", "code": 1, "message": "..."}`.
/// Non-object error values are kept as the message with code 0.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    pub data: Option<Value>,
}

impl JsonRpcError {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(obj) => Self {
                code: obj.get("code").and_then(Value::as_i64).unwrap_or(0),
                message: match obj.get("message") {
                    Some(Value::String(message)) => message.clone(),
                    Some(other) => other.to_string(),
                    None => value.to_string(),
                },
                data: obj.get("data").cloned(),
            },
            Value::String(message) => Self {
                code: 0,
                message: message.clone(),
                data: None,
            },
            other => Self {
                code: 0,
                message: other.to_string(),
                data: None,
            },
        }
    }
}

/// Lossily decode a response body and keep at most
/// [`MAX_ERROR_BODY_CHARS`] characters of it.
pub fn truncate_body(body: &[u8]) -> String {
    String::from_utf8_lossy(body)
        .chars()
        .take(MAX_ERROR_BODY_CHARS)
        .collect()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
