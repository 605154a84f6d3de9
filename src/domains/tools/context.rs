//! Tenant-scoped execution context handed to tool handlers.

use std::sync::Arc;

use crate::core::config::AppConfig;
use crate::core::error::{GatewayError, Result};
use crate::domains::oslc::{OslcClient, SchemaCache};
use crate::domains::tenants::{TenantConfig, TenantStore};

/// Everything a tool handler may touch: the injected state objects plus the
/// tenant identity resolved for this call (possibly absent — some tools do
/// not require one).
#[derive(Clone)]
pub struct ToolContext {
    /// Effective tenant id for this invocation, when one was resolved.
    pub tenant_id: Option<String>,

    /// Process configuration.
    pub config: Arc<AppConfig>,

    /// Tenant configuration store (read-only from tool handlers).
    pub tenants: Arc<TenantStore>,

    /// Shared schema-discovery cache.
    pub schema: Arc<SchemaCache>,

    /// Shared outbound HTTP connector.
    pub http: reqwest::Client,
}

impl ToolContext {
    /// Resolve a tenant id to its configuration and a bound remote client.
    pub fn resolve_tenant(&self, tenant_id: &str) -> Result<(TenantConfig, OslcClient)> {
        let tenant = self
            .tenants
            .get(tenant_id)
            .ok_or_else(|| GatewayError::TenantNotFound {
                tenant_id: tenant_id.to_string(),
            })?;
        let client = OslcClient::new(tenant.clone(), self.http.clone());
        Ok((tenant, client))
    }
}
