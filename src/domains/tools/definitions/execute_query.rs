//! Allowlisted structured query tool.
//!
//! The only path from a caller-supplied filter to the remote system. Every
//! select and filter field is validated against the discovered schema shape
//! before any remote request; translation to the native dialect happens only
//! after validation passes.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};

use super::parse_params;
use crate::core::error::{GatewayError, Result};
use crate::domains::oslc::{QueryArgs, WhereClause, where_from_clauses};
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::registry::{ToolAnnotations, ToolSpec};

/// Hard upper bound on one page of results.
pub const MAX_PAGE_SIZE: i64 = 200;

/// Page size applied when neither the query nor the tenant specifies one.
const DEFAULT_PAGE_SIZE: i64 = 50;

/// Sort direction.
#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// One ordering term.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct OrderBy {
    pub field: String,
    pub dir: SortDir,
}

/// Page bounds. Out-of-range values are clamped, not rejected.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageSpec {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

/// Structured query description, one per invocation.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueryDescription {
    /// Fields to select; empty means `*`.
    #[serde(default)]
    pub select: Vec<String>,
    /// Ordered filter clauses, joined as a flat conjunction.
    #[serde(default)]
    pub r#where: Vec<WhereClause>,
    /// Ordering terms.
    #[serde(default)]
    pub order_by: Vec<OrderBy>,
    /// Page bounds.
    #[serde(default)]
    pub page: PageSpec,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteQueryParams {
    pub tenant_id: String,
    pub resource_type: String,
    pub query: QueryDescription,
}

/// Executes a safe, allowlisted structured query against a resource type.
pub struct ExecuteQueryTool;

impl ExecuteQueryTool {
    pub const NAME: &'static str = "eam.executeQuery";

    pub const DESCRIPTION: &'static str =
        "Execute a safe, allowlisted structured query against a resource type; fields are validated against the discovered schema.";

    pub fn spec() -> ToolSpec {
        ToolSpec {
            name: Self::NAME,
            description: Self::DESCRIPTION,
            input_schema: serde_json::to_value(schemars::schema_for!(ExecuteQueryParams))
                .unwrap_or(Value::Null),
            annotations: ToolAnnotations {
                read_only: true,
                tenant_scoped: true,
                group: "Query",
            },
        }
    }

    pub async fn run(ctx: &ToolContext, input: Value) -> Result<Value> {
        let params: ExecuteQueryParams = parse_params(input)?;
        let (tenant, client) = ctx.resolve_tenant(&params.tenant_id)?;
        let query = &params.query;

        let shape = ctx
            .schema
            .get_shape(
                &params.tenant_id,
                &params.resource_type,
                &client,
                tenant.metadata_ttl_seconds,
            )
            .await?;
        let allow: std::collections::HashSet<&str> =
            shape.fields.iter().map(String::as_str).collect();

        for field in &query.select {
            if field != "*" && !allow.contains(field.as_str()) {
                return Err(GatewayError::FieldNotAllowed {
                    field: field.clone(),
                });
            }
        }
        for clause in &query.r#where {
            if !allow.contains(clause.field.as_str()) {
                return Err(GatewayError::FilterFieldNotAllowed {
                    field: clause.field.clone(),
                });
            }
        }

        let translated = where_from_clauses(&query.r#where)?;
        let where_clause = if translated.is_empty() {
            tenant.oslc.as_ref().and_then(|o| o.where_default.clone())
        } else {
            Some(translated)
        };

        let tenant_page_size = tenant
            .oslc
            .as_ref()
            .and_then(|o| o.page_size)
            .map(i64::from);
        let limit = query
            .page
            .limit
            .or(tenant_page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let offset = query.page.offset.unwrap_or(0).max(0);

        let select = if query.select.is_empty() {
            "*".to_string()
        } else {
            query.select.join(",")
        };
        let order_by = if query.order_by.is_empty() {
            None
        } else {
            Some(
                query
                    .order_by
                    .iter()
                    .map(|o| format!("{} {}", o.field, o.dir.as_str()))
                    .collect::<Vec<_>>()
                    .join(","),
            )
        };

        let page = client
            .query(
                &params.resource_type,
                &QueryArgs {
                    where_clause,
                    select,
                    order_by,
                    page_size: limit as u32,
                    start: offset.min(i64::from(u32::MAX)) as u32,
                },
            )
            .await?;

        let count = page.count.unwrap_or(page.items.len() as u64);
        Ok(json!({
            "items": page.items,
            "page": { "limit": limit, "offset": offset, "count": count },
            "shape": { "fields": shape.fields },
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_decode_from_contract_shape() {
        let params: ExecuteQueryParams = serde_json::from_value(json!({
            "tenantId": "t1",
            "resourceType": "mxasset",
            "query": {
                "select": ["assetnum", "status"],
                "where": [{"field": "status", "op": "=", "value": "OPERATING"}],
                "orderBy": [{"field": "assetnum", "dir": "asc"}],
                "page": {"limit": 10, "offset": 0}
            }
        }))
        .unwrap();
        assert_eq!(params.resource_type, "mxasset");
        assert_eq!(params.query.select.len(), 2);
        assert_eq!(params.query.page.limit, Some(10));
    }

    #[test]
    fn query_sections_are_optional() {
        let params: ExecuteQueryParams = serde_json::from_value(json!({
            "tenantId": "t1",
            "resourceType": "mxasset",
            "query": {}
        }))
        .unwrap();
        assert!(params.query.select.is_empty());
        assert!(params.query.r#where.is_empty());
        assert!(params.query.page.limit.is_none());
    }

    #[test]
    fn input_schema_is_generated() {
        let spec = ExecuteQueryTool::spec();
        let schema = serde_json::to_value(&spec.input_schema).unwrap();
        assert!(schema.to_string().contains("tenantId"));
        assert!(schema.to_string().contains("resourceType"));
    }
}
