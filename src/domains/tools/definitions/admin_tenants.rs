//! Admin tenant tools.
//!
//! Kept for protocol parity with the admin REST surface: tenant persistence
//! (with its write gating) lives behind `/api/tenants`, so these tools only
//! point callers there instead of duplicating the write path.

use serde_json::{Value, json};

use crate::core::error::Result;
use crate::domains::tools::registry::{ToolAnnotations, ToolSpec};

/// Placeholder for tenant upsert over the tool protocol.
pub struct AdminTenantsUpsertTool;

impl AdminTenantsUpsertTool {
    pub const NAME: &'static str = "admin.tenants.upsert";

    pub const DESCRIPTION: &'static str =
        "Upsert a tenant configuration (persistence handled by the REST admin surface).";

    pub fn spec() -> ToolSpec {
        ToolSpec {
            name: Self::NAME,
            description: Self::DESCRIPTION,
            input_schema: json!({
                "type": "object",
                "additionalProperties": false,
                "required": ["tenant"],
                "properties": { "tenant": { "type": "object" } }
            }),
            annotations: ToolAnnotations {
                read_only: false,
                tenant_scoped: false,
                group: "Admin",
            },
        }
    }

    pub fn run() -> Result<Value> {
        Ok(json!({ "ok": true, "note": "Use POST /api/tenants for persistence." }))
    }
}

/// Placeholder for tenant deletion over the tool protocol.
pub struct AdminTenantsDeleteTool;

impl AdminTenantsDeleteTool {
    pub const NAME: &'static str = "admin.tenants.delete";

    pub const DESCRIPTION: &'static str =
        "Delete a tenant configuration (persistence handled by the REST admin surface).";

    pub fn spec() -> ToolSpec {
        ToolSpec {
            name: Self::NAME,
            description: Self::DESCRIPTION,
            input_schema: json!({
                "type": "object",
                "additionalProperties": false,
                "required": ["tenantId"],
                "properties": { "tenantId": { "type": "string" } }
            }),
            annotations: ToolAnnotations {
                read_only: false,
                tenant_scoped: false,
                group: "Admin",
            },
        }
    }

    pub fn run() -> Result<Value> {
        Ok(json!({ "ok": true, "note": "Use DELETE /api/tenants/{tenantId} for persistence." }))
    }
}
