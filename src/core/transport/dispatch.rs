//! Protocol dispatch: envelope validation, tenant resolution, tool lookup,
//! and error mapping.
//!
//! This layer is transport-independent: the HTTP handler decodes a body and
//! collects the tenant hints, and everything protocol-shaped happens here so
//! it can be exercised without a socket.

use serde_json::Value;

use super::jsonrpc::{APPLICATION_ERROR, JsonRpcResponse, parse_envelope};
use crate::core::error::GatewayError;
use crate::domains::tools::ToolRegistry;

/// Substituted for raw parse errors when the upstream answered with an HTML
/// page: the usual symptom of an auth redirect or a TLS-terminating proxy
/// serving a login page instead of JSON.
const HTML_UPSTREAM_MESSAGE: &str = "Upstream returned HTML where JSON was expected \
     (possible auth/TLS/route issue). Check server logs for upstream status/content-type.";

fn looks_like_html(message: &str) -> bool {
    message.contains("<!DOCTYPE") || message.contains("<html")
}

/// Resolve the effective tenant id for a call.
///
/// Priority: dedicated header, `tenantId` field in params, `tenantId` query
/// parameter. Empty values are treated as absent; an absent tenant id is
/// passed through as "no tenant".
pub fn resolve_tenant_id(
    header_tenant: Option<&str>,
    params: Option<&Value>,
    query_tenant: Option<&str>,
) -> Option<String> {
    let body_tenant = params
        .and_then(|p| p.get("tenantId"))
        .and_then(Value::as_str);
    [header_tenant, body_tenant, query_tenant]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|t| !t.is_empty())
        .map(str::to_string)
}

/// Dispatch one decoded request body and produce the protocol response.
pub async fn dispatch(
    registry: &ToolRegistry,
    body: &Value,
    header_tenant: Option<&str>,
    query_tenant: Option<&str>,
) -> JsonRpcResponse {
    let Some(rpc) = parse_envelope(body) else {
        return JsonRpcResponse::invalid_request();
    };

    let tenant_id = resolve_tenant_id(header_tenant, rpc.params.as_ref(), query_tenant);
    let ctx = registry.make_context(tenant_id);
    let params = rpc.params.unwrap_or_else(|| Value::Object(Default::default()));

    match registry.call(&ctx, &rpc.method, params).await {
        Ok(result) => JsonRpcResponse::success(rpc.id, result),
        Err(GatewayError::UnknownTool { .. }) => JsonRpcResponse::method_not_found(rpc.id),
        Err(e) if e.is_deterministic() => {
            JsonRpcResponse::error(rpc.id, APPLICATION_ERROR, e.to_string(), Some(e.rpc_data()))
        }
        Err(e) => {
            let message = e.to_string();
            let message = if looks_like_html(&message) {
                HTML_UPSTREAM_MESSAGE.to_string()
            } else {
                message
            };
            JsonRpcResponse::error(rpc.id, APPLICATION_ERROR, message, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn header_beats_body_beats_query() {
        let params = json!({ "tenantId": "from-body" });
        assert_eq!(
            resolve_tenant_id(Some("from-header"), Some(&params), Some("from-query")),
            Some("from-header".to_string())
        );
        assert_eq!(
            resolve_tenant_id(None, Some(&params), Some("from-query")),
            Some("from-body".to_string())
        );
        assert_eq!(
            resolve_tenant_id(None, None, Some("from-query")),
            Some("from-query".to_string())
        );
    }

    #[test]
    fn empty_hints_are_skipped() {
        let params = json!({ "tenantId": "  " });
        assert_eq!(
            resolve_tenant_id(Some(""), Some(&params), Some("t3")),
            Some("t3".to_string())
        );
        assert_eq!(resolve_tenant_id(None, None, None), None);
    }

    #[test]
    fn html_detection() {
        assert!(looks_like_html("<!DOCTYPE html><body>login</body>"));
        assert!(looks_like_html("unexpected <html lang=\"en\"> in body"));
        assert!(!looks_like_html("expected value at line 1"));
    }
}
