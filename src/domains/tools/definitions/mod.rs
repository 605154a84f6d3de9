//! Tool definitions module.
//!
//! One file per tool. Each tool declares its name and description as
//! consts, a `spec()` returning catalog metadata, and an async `run()`
//! taking the tool context and raw params.

pub mod admin_tenants;
pub mod execute_operation;
pub mod execute_query;
pub mod get_resource_schema;
pub mod intent_plan;
pub mod list_resource_types;
pub mod list_tenants;
pub mod list_tools;

pub use admin_tenants::{AdminTenantsDeleteTool, AdminTenantsUpsertTool};
pub use execute_operation::ExecuteOperationTool;
pub use execute_query::ExecuteQueryTool;
pub use get_resource_schema::GetResourceSchemaTool;
pub use intent_plan::IntentPlanTool;
pub use list_resource_types::ListResourceTypesTool;
pub use list_tenants::ListTenantsTool;
pub use list_tools::ListToolsTool;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::core::error::{GatewayError, Result};

/// Decode tool params, mapping serde failures to invalid-input errors.
pub(crate) fn parse_params<T: DeserializeOwned>(input: Value) -> Result<T> {
    serde_json::from_value(input).map_err(|e| GatewayError::invalid_input(e.to_string()))
}
