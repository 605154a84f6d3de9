//! Generic write/operation tool with preflight and commit modes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::parse_params;
use crate::core::error::Result;
use crate::domains::oslc::OperationTarget;
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::registry::{ToolAnnotations, ToolSpec};

/// Execution mode: describe the intended change, or perform it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OperationMode {
    Preflight,
    Commit,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteOperationParams {
    pub tenant_id: String,
    pub operation: String,
    pub target: OperationTarget,
    #[serde(default)]
    pub payload: Option<Value>,
    pub mode: OperationMode,
}

/// Executes a generic remote operation as a single best-effort call.
pub struct ExecuteOperationTool;

impl ExecuteOperationTool {
    pub const NAME: &'static str = "eam.executeOperation";

    pub const DESCRIPTION: &'static str =
        "Execute a remote operation with preflight/commit phases; preflight describes the intended change without performing it.";

    pub fn spec() -> ToolSpec {
        ToolSpec {
            name: Self::NAME,
            description: Self::DESCRIPTION,
            input_schema: serde_json::to_value(schemars::schema_for!(ExecuteOperationParams))
                .unwrap_or(Value::Null),
            annotations: ToolAnnotations {
                read_only: false,
                tenant_scoped: true,
                group: "Operations",
            },
        }
    }

    pub async fn run(ctx: &ToolContext, input: Value) -> Result<Value> {
        let params: ExecuteOperationParams = parse_params(input)?;
        // Tenant resolution happens in both modes so a preflight against an
        // unknown tenant fails the same way a commit would.
        let (_tenant, client) = ctx.resolve_tenant(&params.tenant_id)?;
        let payload = params.payload.unwrap_or_else(|| json!({}));

        match params.mode {
            OperationMode::Preflight => Ok(json!({
                "ok": true,
                "mode": "preflight",
                "operation": params.operation,
                "target": params.target,
                "impact": {
                    "note": "Preflight is best-effort; enable domain rules for strict validation."
                },
                "payloadPreview": payload,
            })),
            OperationMode::Commit => {
                let result = client
                    .execute_operation(&params.operation, &params.target, &payload)
                    .await?;
                Ok(json!({ "ok": true, "mode": "commit", "result": result }))
            }
        }
    }
}
