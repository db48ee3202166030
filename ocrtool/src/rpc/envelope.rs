//! JSON-RPC wire types.
//!
//! Requests are loosely typed: `id` and every parameter decode into
//! [`DynamicValue`], a closed set of JSON shapes with `Option` accessors, so
//! handlers pick out fields they understand and ignore the rest.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const JSONRPC_VERSION: &str = "2.0";

pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DynamicValue {
    Null,
    Bool(bool),
    Int(i64),
    /// Integers above `i64::MAX`, kept exact.
    UInt(u64),
    Float(f64),
    Str(String),
    Array(Vec<DynamicValue>),
    Object(BTreeMap<String, DynamicValue>),
}

impl DynamicValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[DynamicValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, DynamicValue>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&DynamicValue> {
        self.as_object()?.get(key)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl std::fmt::Display for DynamicValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::UInt(u) => write!(f, "{u}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Array(_) => write!(f, "[...]"),
            Self::Object(_) => write!(f, "{{...}}"),
        }
    }
}

fn default_jsonrpc() -> String {
    JSONRPC_VERSION.to_string()
}

/// One request line. `params` may be omitted but not `null`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RequestEnvelope {
    #[serde(default = "default_jsonrpc")]
    pub jsonrpc: String,
    pub id: DynamicValue,
    pub method: String,
    #[serde(default)]
    pub params: BTreeMap<String, DynamicValue>,
}

/// Error object carried in the `error` member of a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl RpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            hint: None,
            details: None,
        }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(METHOD_NOT_FOUND, "Method not found")
            .with_details(format!("Unknown method '{method}'"))
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, message)
    }

    pub fn invalid_request(details: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, "Invalid request").with_details(details)
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl std::fmt::Display for RpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

pub fn success_response(id: &DynamicValue, result: Value) -> Value {
    json!({
        "jsonrpc": JSONRPC_VERSION,
        "id": id,
        "result": result,
    })
}

pub fn error_response(id: &DynamicValue, error: &RpcError) -> Value {
    json!({
        "jsonrpc": JSONRPC_VERSION,
        "id": id,
        "error": error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_minimal_envelope() {
        let envelope: RequestEnvelope =
            serde_json::from_str(r#"{"id":1,"method":"initialize"}"#).unwrap();
        assert_eq!(envelope.jsonrpc, "2.0");
        assert_eq!(envelope.id, DynamicValue::Int(1));
        assert!(envelope.params.is_empty());
    }

    #[test]
    fn test_decode_mixed_param_shapes() {
        let envelope: RequestEnvelope = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":"abc","method":"ocr_text","params":{
                "image":"a.png","enhanced":false,"retries":3,
                "output":{"insertAsComment":true,"language":"go"}}}"#,
        )
        .unwrap();

        let params = DynamicValue::Object(envelope.params);
        assert_eq!(params.get("image").and_then(DynamicValue::as_str), Some("a.png"));
        assert_eq!(params.get("enhanced").and_then(DynamicValue::as_bool), Some(false));
        assert_eq!(params.get("retries").and_then(DynamicValue::as_i64), Some(3));
        assert_eq!(
            params
                .get("output")
                .and_then(|o| o.get("language"))
                .and_then(DynamicValue::as_str),
            Some("go")
        );
        assert_eq!(params.get("image").and_then(DynamicValue::as_bool), None);
    }

    #[test]
    fn test_decode_array_params() {
        let envelope: RequestEnvelope = serde_json::from_str(
            r#"{"id":7,"method":"ocr_text","params":{"image":"a.png","langs":["en",["x"]]}}"#,
        )
        .unwrap();

        assert_eq!(envelope.id, DynamicValue::Int(7));
        let langs = envelope.params["langs"].as_array().unwrap();
        assert_eq!(langs.len(), 2);
        assert_eq!(langs[0].as_str(), Some("en"));
        assert_eq!(langs[1].as_array().map(<[_]>::len), Some(1));
        assert_eq!(envelope.params["image"].as_array(), None);
    }

    #[test]
    fn test_large_unsigned_id_echoed_exactly() {
        let envelope: RequestEnvelope =
            serde_json::from_str(r#"{"id":18446744073709551615,"method":"shutdown"}"#).unwrap();
        assert_eq!(envelope.id, DynamicValue::UInt(u64::MAX));

        let value = success_response(&envelope.id, Value::Null);
        assert!(value["id"].is_u64());
        assert_eq!(value["id"].as_u64(), Some(u64::MAX));
    }

    #[test]
    fn test_negative_id_stays_signed() {
        let envelope: RequestEnvelope =
            serde_json::from_str(r#"{"id":-3,"method":"shutdown"}"#).unwrap();
        assert_eq!(envelope.id, DynamicValue::Int(-3));
    }

    #[test]
    fn test_null_params_rejected() {
        let result =
            serde_json::from_str::<RequestEnvelope>(r#"{"id":1,"method":"x","params":null}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_method_or_id_rejected() {
        assert!(serde_json::from_str::<RequestEnvelope>(r#"{"id":1}"#).is_err());
        assert!(serde_json::from_str::<RequestEnvelope>(r#"{"method":"x"}"#).is_err());
    }

    #[test]
    fn test_error_response_shape() {
        let error = RpcError::invalid_params("Invalid format").with_hint("use text");
        let value = error_response(&DynamicValue::Str("7".to_string()), &error);
        assert_eq!(
            value,
            json!({
                "jsonrpc": "2.0",
                "id": "7",
                "error": {"code": -32602, "message": "Invalid format", "hint": "use text"}
            })
        );
    }

    #[test]
    fn test_null_id_serializes_as_null() {
        let value = success_response(&DynamicValue::Null, Value::Null);
        assert_eq!(value, json!({"jsonrpc": "2.0", "id": null, "result": null}));
    }
}
