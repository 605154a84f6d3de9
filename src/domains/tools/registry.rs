//! Tool registry - central catalog and dispatch for all tools.
//!
//! The catalog is fixed at process start: tools are registered here once,
//! closed over the injected state objects (config, tenant store, schema
//! cache, shared HTTP connector), and dispatched by exact name match.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::context::ToolContext;
use super::definitions::{
    AdminTenantsDeleteTool, AdminTenantsUpsertTool, ExecuteOperationTool, ExecuteQueryTool,
    GetResourceSchemaTool, IntentPlanTool, ListResourceTypesTool, ListTenantsTool, ListToolsTool,
};
use crate::core::config::AppConfig;
use crate::core::error::{GatewayError, Result};
use crate::domains::oslc::SchemaCache;
use crate::domains::tenants::TenantStore;

/// Side-effect and scoping annotations published with each tool.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolAnnotations {
    /// Whether the tool performs no writes against the remote system.
    pub read_only: bool,
    /// Whether the tool requires a tenant id to do anything useful.
    pub tenant_scoped: bool,
    /// UI grouping hint.
    pub group: &'static str,
}

/// Catalog metadata for one tool.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
    pub annotations: ToolAnnotations,
}

/// Tool registry - owns the catalog and dispatches calls.
pub struct ToolRegistry {
    config: Arc<AppConfig>,
    tenants: Arc<TenantStore>,
    schema: Arc<SchemaCache>,
    http: reqwest::Client,
    catalog: Vec<ToolSpec>,
}

impl ToolRegistry {
    /// Build the registry and its fixed catalog.
    pub fn new(config: Arc<AppConfig>, tenants: Arc<TenantStore>) -> Self {
        let schema = Arc::new(SchemaCache::new(config.metadata_ttl_seconds_default));
        let catalog = vec![
            ListToolsTool::spec(),
            ListTenantsTool::spec(),
            AdminTenantsUpsertTool::spec(),
            AdminTenantsDeleteTool::spec(),
            ExecuteQueryTool::spec(),
            ExecuteOperationTool::spec(),
            ListResourceTypesTool::spec(),
            GetResourceSchemaTool::spec(),
            IntentPlanTool::spec(),
        ];
        Self {
            config,
            tenants,
            schema,
            http: reqwest::Client::new(),
            catalog,
        }
    }

    /// All registered tool names, in catalog order.
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.catalog.iter().map(|t| t.name).collect()
    }

    /// The process configuration the registry was built with.
    pub fn config(&self) -> &Arc<AppConfig> {
        &self.config
    }

    /// The injected tenant store.
    pub fn tenants(&self) -> &Arc<TenantStore> {
        &self.tenants
    }

    /// Build a tool context bound to an (optional) tenant id.
    pub fn make_context(&self, tenant_id: Option<String>) -> ToolContext {
        ToolContext {
            tenant_id,
            config: self.config.clone(),
            tenants: self.tenants.clone(),
            schema: self.schema.clone(),
            http: self.http.clone(),
        }
    }

    /// Dispatch a call to the named tool.
    pub async fn call(&self, ctx: &ToolContext, name: &str, params: Value) -> Result<Value> {
        match name {
            ListToolsTool::NAME => {
                ListToolsTool::run(&self.catalog, self.config.tool_catalog_limit)
            }
            ListTenantsTool::NAME => ListTenantsTool::run(ctx),
            AdminTenantsUpsertTool::NAME => AdminTenantsUpsertTool::run(),
            AdminTenantsDeleteTool::NAME => AdminTenantsDeleteTool::run(),
            ExecuteQueryTool::NAME => ExecuteQueryTool::run(ctx, params).await,
            ExecuteOperationTool::NAME => ExecuteOperationTool::run(ctx, params).await,
            ListResourceTypesTool::NAME => ListResourceTypesTool::run(ctx, params).await,
            GetResourceSchemaTool::NAME => GetResourceSchemaTool::run(ctx, params).await,
            IntentPlanTool::NAME => IntentPlanTool::run(params),
            _ => Err(GatewayError::UnknownTool {
                name: name.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_registry(limit: usize) -> ToolRegistry {
        let config = Arc::new(AppConfig {
            tool_catalog_limit: limit,
            ..AppConfig::default()
        });
        let dir = tempfile::tempdir().unwrap();
        let tenants = Arc::new(TenantStore::load(dir.path().join("tenants.json")).unwrap());
        ToolRegistry::new(config, tenants)
    }

    #[test]
    fn catalog_has_expected_names() {
        let registry = test_registry(128);
        let names = registry.tool_names();
        assert_eq!(names.len(), 9);
        assert!(names.contains(&"mcp.listTools"));
        assert!(names.contains(&"tenants.list"));
        assert!(names.contains(&"admin.tenants.upsert"));
        assert!(names.contains(&"admin.tenants.delete"));
        assert!(names.contains(&"eam.executeQuery"));
        assert!(names.contains(&"eam.executeOperation"));
        assert!(names.contains(&"eam.metadata.listResourceTypes"));
        assert!(names.contains(&"eam.metadata.getResourceSchema"));
        assert!(names.contains(&"eam.intentToQueryPlan"));
    }

    #[tokio::test]
    async fn list_tools_respects_catalog_limit() {
        let registry = test_registry(3);
        let ctx = registry.make_context(None);
        let out = registry
            .call(&ctx, "mcp.listTools", json!({}))
            .await
            .unwrap();
        assert_eq!(out.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn list_tools_is_idempotent() {
        let registry = test_registry(128);
        let ctx = registry.make_context(None);
        let first = registry
            .call(&ctx, "mcp.listTools", json!({}))
            .await
            .unwrap();
        let second = registry
            .call(&ctx, "mcp.listTools", json!({}))
            .await
            .unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn unknown_tool_maps_to_method_not_found() {
        let registry = test_registry(128);
        let ctx = registry.make_context(None);
        let err = registry.call(&ctx, "no.such.tool", json!({})).await.unwrap_err();
        assert!(matches!(err, GatewayError::UnknownTool { .. }));
    }

    #[tokio::test]
    async fn tenant_scoped_tool_without_tenant_fails_downstream() {
        let registry = test_registry(128);
        let ctx = registry.make_context(None);
        let err = registry
            .call(
                &ctx,
                "eam.metadata.getResourceSchema",
                json!({ "tenantId": "ghost", "resourceType": "mxasset" }),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "TENANT_NOT_FOUND");
    }
}
