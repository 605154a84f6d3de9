//! Catalog listing tool.

use serde_json::{Value, json};

use crate::core::error::Result;
use crate::domains::tools::registry::{ToolAnnotations, ToolSpec};

/// Lists the tool catalog, truncated to the configured limit.
pub struct ListToolsTool;

impl ListToolsTool {
    pub const NAME: &'static str = "mcp.listTools";

    pub const DESCRIPTION: &'static str =
        "List available tools (name, description, input schema, annotations), capped by TOOL_CATALOG_LIMIT.";

    /// Catalog metadata for this tool.
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
                group: "Catalog",
            },
        }
    }

    /// The catalog is deterministic: same registry, same bytes.
    pub fn run(catalog: &[ToolSpec], limit: usize) -> Result<Value> {
        let tools: Vec<Value> = catalog
            .iter()
            .take(limit)
            .map(|spec| serde_json::to_value(spec))
            .collect::<std::result::Result<_, _>>()?;
        Ok(Value::Array(tools))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_to_limit() {
        let catalog = vec![ListToolsTool::spec(), ListToolsTool::spec()];
        let out = ListToolsTool::run(&catalog, 1).unwrap();
        assert_eq!(out.as_array().unwrap().len(), 1);
    }

    #[test]
    fn output_is_byte_identical_across_calls() {
        let catalog = vec![ListToolsTool::spec()];
        let a = serde_json::to_string(&ListToolsTool::run(&catalog, 10).unwrap()).unwrap();
        let b = serde_json::to_string(&ListToolsTool::run(&catalog, 10).unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn entries_expose_contract_fields() {
        let out = ListToolsTool::run(&[ListToolsTool::spec()], 10).unwrap();
        let entry = &out.as_array().unwrap()[0];
        assert_eq!(entry["name"], ListToolsTool::NAME);
        assert!(entry["inputSchema"].is_object());
        assert_eq!(entry["annotations"]["readOnly"], true);
        assert_eq!(entry["annotations"]["tenantScoped"], false);
    }
}
