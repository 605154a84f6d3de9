//! Tenant listing tool.

use serde_json::{Value, json};

use crate::core::error::Result;
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::registry::{ToolAnnotations, ToolSpec};

/// Lists configured tenants with all credential material redacted.
pub struct ListTenantsTool;

impl ListTenantsTool {
    pub const NAME: &'static str = "tenants.list";

    pub const DESCRIPTION: &'static str =
        "List configured tenants (redacted: identity and credential references only, never secrets).";

    pub fn spec() -> ToolSpec {
        ToolSpec {
            name: Self::NAME,
            description: Self::DESCRIPTION,
            input_schema: json!({
                "type": "object",
                "additionalProperties": false,
                "properties": {}
            }),
            annotations: ToolAnnotations {
                read_only: true,
                tenant_scoped: false,
                group: "Tenants",
            },
        }
    }

    pub fn run(ctx: &ToolContext) -> Result<Value> {
        Ok(json!({ "tenants": ctx.tenants.list() }))
    }
}
