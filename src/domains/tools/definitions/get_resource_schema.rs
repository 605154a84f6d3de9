//! Resource schema inspection tool.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};

use super::parse_params;
use crate::core::error::Result;
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::registry::{ToolAnnotations, ToolSpec};

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetResourceSchemaParams {
    pub tenant_id: String,
    pub resource_type: String,
}

/// Returns the cached, sample-inferred schema for a resource type.
pub struct GetResourceSchemaTool;

impl GetResourceSchemaTool {
    pub const NAME: &'static str = "eam.metadata.getResourceSchema";

    pub const DESCRIPTION: &'static str =
        "Get the inferred schema for a resource type (fields sampled from one record, cached per tenant).";

    pub fn spec() -> ToolSpec {
        ToolSpec {
            name: Self::NAME,
            description: Self::DESCRIPTION,
            input_schema: serde_json::to_value(schemars::schema_for!(GetResourceSchemaParams))
                .unwrap_or(Value::Null),
            annotations: ToolAnnotations {
                read_only: true,
                tenant_scoped: true,
                group: "Metadata",
            },
        }
    }

    pub async fn run(ctx: &ToolContext, input: Value) -> Result<Value> {
        let params: GetResourceSchemaParams = parse_params(input)?;
        let (tenant, client) = ctx.resolve_tenant(&params.tenant_id)?;
        let shape = ctx
            .schema
            .get_shape(
                &params.tenant_id,
                &params.resource_type,
                &client,
                tenant.metadata_ttl_seconds,
            )
            .await?;
        Ok(json!({
            "resourceType": params.resource_type,
            "fields": shape.fields,
            "discoveredAt": shape.discovered_at,
        }))
    }
}
