//! JSON-RPC 2.0 envelope types.
//!
//! The gateway speaks a JSON-RPC-shaped protocol where each tool name is a
//! method. Envelope validation is strict: the version marker must be exactly
//! "2.0", `method` must be a string, and the `id` member must be present
//! (null is a legal id, a missing member is not).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reserved protocol error codes.
pub const INVALID_REQUEST: i32 = -32600;
/// Method lookup failed.
pub const METHOD_NOT_FOUND: i32 = -32601;
/// Generic application/tool failure.
pub const APPLICATION_ERROR: i32 = -32000;

/// A validated JSON-RPC request envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: Value,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// JSON-RPC response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Parse a decoded request body into a validated envelope.
///
/// Returns `None` for anything that is not a well-formed request: wrong or
/// missing version marker, missing `method`, or missing `id` member.
pub fn parse_envelope(body: &Value) -> Option<JsonRpcRequest> {
    let obj = body.as_object()?;
    if obj.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
        return None;
    }
    let method = obj.get("method")?.as_str()?.to_string();
    let id = obj.get("id")?.clone();
    Some(JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        id,
        method,
        params: obj.get("params").cloned(),
    })
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Value, code: i32, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data,
            }),
        }
    }

    /// Invalid request error (protocol level, id unknown).
    pub fn invalid_request() -> Self {
        Self::error(Value::Null, INVALID_REQUEST, "Invalid Request", None)
    }

    /// Method not found error.
    pub fn method_not_found(id: Value) -> Self {
        Self::error(id, METHOD_NOT_FOUND, "Method not found", None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_well_formed_envelope() {
        let body = json!({"jsonrpc": "2.0", "id": 7, "method": "mcp.listTools"});
        let rpc = parse_envelope(&body).unwrap();
        assert_eq!(rpc.method, "mcp.listTools");
        assert_eq!(rpc.id, json!(7));
        assert!(rpc.params.is_none());
    }

    #[test]
    fn null_id_is_legal_but_missing_id_is_not() {
        let with_null = json!({"jsonrpc": "2.0", "id": null, "method": "m"});
        assert!(parse_envelope(&with_null).is_some());

        let without_id = json!({"jsonrpc": "2.0", "method": "m"});
        assert!(parse_envelope(&without_id).is_none());
    }

    #[test]
    fn rejects_wrong_version_marker() {
        assert!(parse_envelope(&json!({"jsonrpc": "1.0", "id": 1, "method": "m"})).is_none());
        assert!(parse_envelope(&json!({"id": 1, "method": "m"})).is_none());
        assert!(parse_envelope(&json!({"jsonrpc": "2.0", "id": 1, "method": 42})).is_none());
        assert!(parse_envelope(&json!("not an object")).is_none());
    }

    #[test]
    fn response_serialization_keeps_null_id() {
        let resp = JsonRpcResponse::invalid_request();
        let v = serde_json::to_value(&resp).unwrap();
        assert!(v.get("id").is_some());
        assert_eq!(v["id"], Value::Null);
        assert_eq!(v["error"]["code"], INVALID_REQUEST);
        assert!(v.get("result").is_none());
    }
}
