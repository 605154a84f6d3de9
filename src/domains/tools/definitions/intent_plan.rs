//! Deterministic intent-to-plan mapping tool.
//!
//! A keyword heuristic, not a language model: the same intent text always
//! maps to the same plan. Higher-level chat orchestration refines the plan
//! before feeding it to the query tool.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};

use super::parse_params;
use crate::core::error::Result;
use crate::domains::tools::registry::{ToolAnnotations, ToolSpec};

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IntentPlanParams {
    pub tenant_id: String,
    pub intent: String,
}

/// Keyword → resource type mapping, first match wins.
const INTENT_KEYWORDS: [(&str, &str); 7] = [
    ("asset", "mxasset"),
    ("location", "mxlocation"),
    ("inventory", "mxinv"),
    ("service request", "mxsr"),
    ("sr", "mxsr"),
    ("job plan", "mxjobplan"),
    ("preventive", "mxpm"),
];

/// Maps a free-text intent to a structured query plan.
pub struct IntentPlanTool;

impl IntentPlanTool {
    pub const NAME: &'static str = "eam.intentToQueryPlan";

    pub const DESCRIPTION: &'static str =
        "Convert a free-text intent to a structured query plan (deterministic keyword heuristic).";

    pub fn spec() -> ToolSpec {
        ToolSpec {
            name: Self::NAME,
            description: Self::DESCRIPTION,
            input_schema: serde_json::to_value(schemars::schema_for!(IntentPlanParams))
                .unwrap_or(Value::Null),
            annotations: ToolAnnotations {
                read_only: true,
                tenant_scoped: true,
                group: "Agent",
            },
        }
    }

    pub fn run(input: Value) -> Result<Value> {
        let params: IntentPlanParams = parse_params(input)?;
        let intent = params.intent.to_lowercase();

        let resource_type = INTENT_KEYWORDS
            .iter()
            .find(|(keyword, _)| intent.contains(keyword))
            .map(|(_, rt)| *rt)
            .unwrap_or("mxwo");

        Ok(json!({
            "tenantId": params.tenant_id,
            "resourceType": resource_type,
            "select": ["*"],
            "where": [{ "field": "status", "op": "notnull" }],
            "page": { "limit": 25, "offset": 0 },
            "rationale": "Heuristic intent mapping; refine with the schema browser.",
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(intent: &str) -> Value {
        IntentPlanTool::run(json!({ "tenantId": "t1", "intent": intent })).unwrap()
    }

    #[test]
    fn keywords_map_to_resource_types() {
        assert_eq!(plan("show me failing assets")["resourceType"], "mxasset");
        assert_eq!(plan("open service request backlog")["resourceType"], "mxsr");
        assert_eq!(plan("inventory below reorder point")["resourceType"], "mxinv");
    }

    #[test]
    fn unknown_intent_defaults_to_work_orders() {
        assert_eq!(plan("what happened overnight")["resourceType"], "mxwo");
    }

    #[test]
    fn same_intent_same_plan() {
        assert_eq!(plan("asset health"), plan("asset health"));
    }
}
