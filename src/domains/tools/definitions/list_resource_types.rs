//! Resource-type listing tool.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};

use super::parse_params;
use crate::core::error::Result;
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::registry::{ToolAnnotations, ToolSpec};

/// Resource types most deployments expose, used when neither tenant
/// configuration nor live discovery yields anything.
pub const COMMON_RESOURCE_TYPES: [&str; 7] = [
    "mxwo",
    "mxasset",
    "mxlocation",
    "mxsr",
    "mxinv",
    "mxjobplan",
    "mxpm",
];

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListResourceTypesParams {
    pub tenant_id: String,
}

/// Lists the resource types available to a tenant.
///
/// Preference order: explicit tenant allowlist, live service-description
/// discovery, built-in common list. Discovery is best-effort and never
/// fails the call.
pub struct ListResourceTypesTool;

impl ListResourceTypesTool {
    pub const NAME: &'static str = "eam.metadata.listResourceTypes";

    pub const DESCRIPTION: &'static str =
        "List available resource types (tenant allowlist if set, otherwise best-effort discovery with a built-in fallback).";

    pub fn spec() -> ToolSpec {
        ToolSpec {
            name: Self::NAME,
            description: Self::DESCRIPTION,
            input_schema: serde_json::to_value(schemars::schema_for!(ListResourceTypesParams))
                .unwrap_or(Value::Null),
            annotations: ToolAnnotations {
                read_only: true,
                tenant_scoped: true,
                group: "Metadata",
            },
        }
    }

    pub async fn run(ctx: &ToolContext, input: Value) -> Result<Value> {
        let params: ListResourceTypesParams = parse_params(input)?;
        let (tenant, client) = ctx.resolve_tenant(&params.tenant_id)?;

        if let Some(allowlist) = tenant.resource_types.as_ref().filter(|l| !l.is_empty()) {
            let mut names = allowlist.clone();
            names.sort();
            return Ok(json!({ "resourceTypes": names }));
        }

        let found = client.list_resource_types_fallback().await;
        let names: Vec<String> = if found.is_empty() {
            COMMON_RESOURCE_TYPES.iter().map(|s| s.to_string()).collect()
        } else {
            found
        };
        Ok(json!({ "resourceTypes": names }))
    }
}
