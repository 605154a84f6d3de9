//! Remote query client for the OSLC-dialect REST interface.
//!
//! One client is bound to one tenant and shares the process-wide reqwest
//! client. All responses are normalized into a uniform `{items, count}`
//! shape: deployments differ in which envelope key carries the member list,
//! so extraction walks an ordered candidate table and the first present
//! array wins.

use std::collections::BTreeSet;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, Url};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info};

use super::auth::auth_headers;
use crate::core::error::{GatewayError, Result};
use crate::domains::tenants::TenantConfig;

/// Envelope keys that may carry the member list, in priority order.
const MEMBER_KEYS: [&str; 4] = ["member", "rdfs_member", "rdfs:member", "oslc:member"];

/// Envelope keys that may carry the total count, in priority order.
const COUNT_KEYS: [&str; 2] = ["totalCount", "oslc:totalCount"];

/// Maximum characters of upstream body carried in diagnostics.
const SNIPPET_LIMIT: usize = 800;

/// Arguments for one paged query.
#[derive(Debug, Clone)]
pub struct QueryArgs {
    /// Native filter expression; omitted from the request when empty.
    pub where_clause: Option<String>,
    /// Select expression (`*` or a comma-joined field list).
    pub select: String,
    /// Order expression (`field dir` pairs, comma-joined).
    pub order_by: Option<String>,
    /// Page size (callers clamp to 1-200).
    pub page_size: u32,
    /// Zero-based offset; the wire protocol is 1-based.
    pub start: u32,
}

/// Normalized result of one paged query.
#[derive(Debug, Clone, Default)]
pub struct QueryPage {
    pub items: Vec<Value>,
    pub count: Option<u64>,
}

/// Target of a write/operation call.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OperationTarget {
    /// Resource type the record belongs to.
    pub resource_type: String,
    /// Record key, or an absolute URL addressing the record directly.
    pub key: String,
}

/// Truncate an upstream body for diagnostics, never splitting a character.
pub(crate) fn body_snippet(body: &str, limit: usize) -> String {
    let mut out: String = body.chars().take(limit).collect();
    if out.len() < body.len() {
        out.push('…');
    }
    out
}

/// Pick the member list out of a response envelope.
fn extract_members(envelope: &Value) -> Vec<Value> {
    for key in MEMBER_KEYS {
        if let Some(items) = envelope.get(key).and_then(Value::as_array) {
            return items.clone();
        }
    }
    Vec::new()
}

/// Pick the total count out of a response envelope, when present.
fn extract_count(envelope: &Value) -> Option<u64> {
    for key in COUNT_KEYS {
        match envelope.get(key) {
            Some(Value::Number(n)) => return n.as_u64(),
            Some(Value::String(s)) => {
                if let Ok(n) = s.parse::<u64>() {
                    return Some(n);
                }
            }
            _ => {}
        }
    }
    None
}

/// HTTP client bound to one tenant's remote system.
#[derive(Debug, Clone)]
pub struct OslcClient {
    tenant: TenantConfig,
    http: reqwest::Client,
}

impl OslcClient {
    /// Create a client for this tenant over the shared HTTP connector.
    pub fn new(tenant: TenantConfig, http: reqwest::Client) -> Self {
        Self { tenant, http }
    }

    /// The bound tenant configuration.
    pub fn tenant(&self) -> &TenantConfig {
        &self.tenant
    }

    /// Build `{base}/oslc/os/{segments...}` with proper path encoding.
    fn os_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.tenant.base_url).map_err(|e| {
            GatewayError::internal(format!(
                "tenant {} baseUrl unparseable: {e}",
                self.tenant.tenant_id
            ))
        })?;
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                GatewayError::internal(format!(
                    "tenant {} baseUrl cannot carry a path",
                    self.tenant.tenant_id
                ))
            })?;
            path.pop_if_empty();
            path.push("oslc");
            path.push("os");
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    /// Execute one paged query and normalize the response envelope.
    pub async fn query(&self, resource_type: &str, args: &QueryArgs) -> Result<QueryPage> {
        let mut url = self.os_url(&[resource_type])?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(where_clause) = args.where_clause.as_deref() {
                if !where_clause.trim().is_empty() {
                    pairs.append_pair("oslc.where", where_clause);
                }
            }
            pairs.append_pair("oslc.select", &args.select);
            pairs.append_pair("oslc.pageSize", &args.page_size.to_string());
            pairs.append_pair("oslc.paging", "true");
            // The wire protocol is 1-based.
            let start_index = args.start.saturating_add(1).max(1);
            pairs.append_pair("oslc.startIndex", &start_index.to_string());
            if let Some(order_by) = args.order_by.as_deref() {
                pairs.append_pair("oslc.orderBy", order_by);
            }
        }

        let headers = auth_headers(&self.http, &self.tenant).await?;
        let response = self
            .http
            .get(url.clone())
            .headers(headers)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        info!("GET {url} -> {status} {content_type}");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GatewayError::RemoteQueryFailed {
                resource_type: resource_type.to_string(),
                status: status.as_u16(),
                content_type,
                body_snippet: body_snippet(&text, SNIPPET_LIMIT),
            });
        }

        let text = response.text().await?;
        let envelope: Value =
            serde_json::from_str(&text).map_err(|_| GatewayError::RemoteResponseNotJson {
                resource_type: resource_type.to_string(),
                content_type,
                body_snippet: body_snippet(&text, 300),
            })?;

        Ok(QueryPage {
            items: extract_members(&envelope),
            count: extract_count(&envelope),
        })
    }

    /// Fetch one record by key, or `None` when no record matches.
    pub async fn get_one(&self, resource_type: &str, key: &str) -> Result<Option<Value>> {
        let page = self
            .query(
                resource_type,
                &QueryArgs {
                    where_clause: Some(key.to_string()),
                    select: "*".to_string(),
                    order_by: None,
                    page_size: 1,
                    start: 0,
                },
            )
            .await?;
        Ok(page.items.into_iter().next())
    }

    /// Execute a generic write/operation call.
    ///
    /// A key that is itself an absolute URL is updated in place; otherwise
    /// the action URL is constructed from resource type, key, and operation
    /// name. A success body that is not JSON is wrapped, not rejected.
    pub async fn execute_operation(
        &self,
        operation: &str,
        target: &OperationTarget,
        payload: &Value,
    ) -> Result<Value> {
        let headers = auth_headers(&self.http, &self.tenant).await?;

        let (method, url) = if target.key.starts_with("http://") || target.key.starts_with("https://")
        {
            let url = Url::parse(&target.key).map_err(|_| {
                GatewayError::invalid_input(format!("target.key is not a valid URL: {}", target.key))
            })?;
            (Method::PATCH, url)
        } else {
            (
                Method::POST,
                self.os_url(&[&target.resource_type, &target.key, "action", operation])?,
            )
        };

        let response = self
            .http
            .request(method.clone(), url.clone())
            .headers(headers)
            .header(ACCEPT, "application/json")
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        info!("{method} {url} -> {status}");
        if !status.is_success() {
            return Err(GatewayError::RemoteOperationFailed {
                operation: operation.to_string(),
                status: status.as_u16(),
                target: serde_json::to_value(target)?,
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text).unwrap_or_else(|_| json!({ "ok": true, "raw": text })))
    }

    /// Best-effort probe of the service-description endpoint.
    ///
    /// Discovery must never block a query tool: every failure mode degrades
    /// to an empty list and the caller falls back to static configuration.
    pub async fn list_resource_types_fallback(&self) -> Vec<String> {
        match self.try_list_resource_types().await {
            Ok(names) => names,
            Err(e) => {
                debug!("service-description probe failed: {e}");
                Vec::new()
            }
        }
    }

    async fn try_list_resource_types(&self) -> Result<Vec<String>> {
        let url = self.os_url(&[])?;
        let headers = auth_headers(&self.http, &self.tenant).await?;
        let response = self
            .http
            .get(url.clone())
            .headers(headers)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        info!("GET {url} -> {status}");
        if !status.is_success() {
            return Ok(Vec::new());
        }

        let envelope: Value = response.json().await?;
        let members = envelope
            .get("member")
            .or_else(|| envelope.get("oslc:member"))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut names = BTreeSet::new();
        for member in &members {
            let title = member
                .get("title")
                .or_else(|| member.get("dcterms:title"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            if !title.is_empty() {
                names.insert(title.to_string());
                continue;
            }
            let href = member
                .get("href")
                .or_else(|| member.get("rdf:about"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            if let Some((_, name)) = href.split_once("/oslc/os/") {
                if !name.is_empty() {
                    names.insert(name.to_string());
                }
            }
        }
        Ok(names.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tenants::model::api_key_tenant;

    #[test]
    fn member_extraction_follows_priority_order() {
        let envelope = json!({
            "rdfs:member": [{"a": 2}],
            "member": [{"a": 1}],
        });
        assert_eq!(extract_members(&envelope), vec![json!({"a": 1})]);

        let alt = json!({"oslc:member": [{"b": 1}]});
        assert_eq!(extract_members(&alt), vec![json!({"b": 1})]);

        // Absence of every known key yields empty, not an error.
        assert!(extract_members(&json!({"unrelated": 1})).is_empty());
        // A non-array under a known key is skipped.
        assert!(extract_members(&json!({"member": "oops"})).is_empty());
    }

    #[test]
    fn count_extraction_accepts_numbers_and_numeric_strings() {
        assert_eq!(extract_count(&json!({"totalCount": 12})), Some(12));
        assert_eq!(extract_count(&json!({"oslc:totalCount": "7"})), Some(7));
        assert_eq!(extract_count(&json!({"totalCount": "n/a"})), None);
        assert_eq!(extract_count(&json!({})), None);
    }

    #[test]
    fn snippet_is_bounded_and_char_safe() {
        let short = body_snippet("hello", 800);
        assert_eq!(short, "hello");

        let long = "x".repeat(900);
        let snip = body_snippet(&long, 800);
        assert_eq!(snip.chars().count(), 801);
        assert!(snip.ends_with('…'));

        // Multi-byte input must not be split mid-character.
        let accented = "é".repeat(10);
        assert_eq!(body_snippet(&accented, 4), format!("{}…", "é".repeat(4)));
    }

    #[test]
    fn os_url_handles_trailing_slash_and_encoding() {
        let mut tenant = api_key_tenant("t1");
        tenant.base_url = "https://host.example.com/maximo/".to_string();
        let client = OslcClient::new(tenant, reqwest::Client::new());

        let url = client.os_url(&["mxasset"]).unwrap();
        assert_eq!(url.as_str(), "https://host.example.com/maximo/oslc/os/mxasset");

        let odd = client.os_url(&["mx asset"]).unwrap();
        assert_eq!(odd.as_str(), "https://host.example.com/maximo/oslc/os/mx%20asset");
    }
}
