//! Error types and handling for the gateway.
//!
//! This module defines a unified error type covering the deterministic
//! application failures (stable code, structured details, retryable flag)
//! and the non-deterministic transport/serialization failures. The JSON-RPC
//! dispatcher maps the former to protocol errors carrying their code and
//! details, and the latter to a generic application error.

use serde_json::{Value, json};
use thiserror::Error;

/// A specialized Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

fn status_text(status: &Option<u16>) -> String {
    match status {
        Some(s) => s.to_string(),
        None => "unreachable".to_string(),
    }
}

/// Unified error type for the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No tenant configuration matches the requested id.
    #[error("Tenant not found: {tenant_id}")]
    TenantNotFound { tenant_id: String },

    /// The configured auth mode is missing required credential material.
    #[error("Missing credential for tenant {tenant_id} ({mode}): {detail}")]
    MissingCredential {
        tenant_id: String,
        mode: &'static str,
        detail: String,
    },

    /// A tenant record failed validation.
    #[error("Tenant validation failed: {0}")]
    TenantInvalid(String),

    /// The tenants file could not be loaded.
    #[error("Failed to load tenants file {path}: {reason}")]
    TenantsLoadFailed { path: String, reason: String },

    /// The tenants file could not be persisted.
    #[error("Failed to persist tenants file {path}: {reason}")]
    TenantsWriteFailed { path: String, reason: String },

    /// Configuration writes are disabled on this server.
    #[error("Config writes are disabled")]
    ConfigWriteDisabled,

    /// Approvals are disabled in this build.
    #[error("Approvals are disabled")]
    ApprovalsDisabled,

    /// The OAuth2 token endpoint was unreachable or answered non-success.
    #[error("OAuth token request failed ({})", status_text(.status))]
    TokenRequestFailed {
        token_url: String,
        status: Option<u16>,
    },

    /// The OAuth2 token endpoint answered with a body that is not JSON.
    #[error("OAuth token response was not JSON ({status})")]
    TokenParseFailed {
        status: u16,
        content_type: String,
        body_snippet: String,
    },

    /// The OAuth2 token envelope carried no access token.
    #[error("OAuth token response missing access_token")]
    TokenMissing,

    /// The remote query endpoint answered non-success.
    #[error("OSLC query failed ({status})")]
    RemoteQueryFailed {
        resource_type: String,
        status: u16,
        content_type: String,
        body_snippet: String,
    },

    /// The remote query endpoint answered success with a non-JSON body.
    #[error("OSLC query returned non-JSON response")]
    RemoteResponseNotJson {
        resource_type: String,
        content_type: String,
        body_snippet: String,
    },

    /// The remote operation endpoint answered non-success.
    #[error("OSLC operation failed ({status})")]
    RemoteOperationFailed {
        operation: String,
        status: u16,
        target: Value,
    },

    /// A select field is not present in the discovered schema.
    #[error("Select field not allowed: {field}")]
    FieldNotAllowed { field: String },

    /// A filter field is not present in the discovered schema.
    #[error("Filter field not allowed: {field}")]
    FilterFieldNotAllowed { field: String },

    /// An `in` clause was given a non-array value.
    #[error("in operator requires array value for field {field}")]
    InvalidInClause { field: String },

    /// Tool input failed to decode or carried unacceptable values.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No tool with the requested name exists in the catalog.
    ///
    /// The dispatcher maps this to the protocol-level method-not-found
    /// error rather than an application error.
    #[error("Method not found: {name}")]
    UnknownTool { name: String },

    /// Network-level failure talking to the remote system.
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors from file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal errors that should not occur under normal operation.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Create a new invalid-input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TenantNotFound { .. } => "TENANT_NOT_FOUND",
            Self::MissingCredential { .. } => "MISSING_CREDENTIAL",
            Self::TenantInvalid(_) => "TENANT_INVALID",
            Self::TenantsLoadFailed { .. } => "TENANTS_LOAD_FAILED",
            Self::TenantsWriteFailed { .. } => "TENANTS_WRITE_FAILED",
            Self::ConfigWriteDisabled => "CONFIG_WRITE_DISABLED",
            Self::ApprovalsDisabled => "APPROVALS_DISABLED",
            Self::TokenRequestFailed { .. } => "TOKEN_REQUEST_FAILED",
            Self::TokenParseFailed { .. } => "TOKEN_PARSE_FAILED",
            Self::TokenMissing => "TOKEN_MISSING",
            Self::RemoteQueryFailed { .. } => "REMOTE_QUERY_FAILED",
            Self::RemoteResponseNotJson { .. } => "REMOTE_RESPONSE_NOT_JSON",
            Self::RemoteOperationFailed { .. } => "REMOTE_OPERATION_FAILED",
            Self::FieldNotAllowed { .. } => "FIELD_NOT_ALLOWED",
            Self::FilterFieldNotAllowed { .. } => "FILTER_FIELD_NOT_ALLOWED",
            Self::InvalidInClause { .. } => "INVALID_IN_CLAUSE",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::UnknownTool { .. } => "METHOD_NOT_FOUND",
            Self::Upstream(_) => "UPSTREAM_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Structured diagnostic details, when the variant carries any.
    pub fn details(&self) -> Option<Value> {
        match self {
            Self::TenantNotFound { tenant_id } => Some(json!({ "tenantId": tenant_id })),
            Self::MissingCredential { tenant_id, mode, .. } => {
                Some(json!({ "tenantId": tenant_id, "authMode": mode }))
            }
            Self::TokenRequestFailed { token_url, status } => {
                Some(json!({ "tokenUrl": token_url, "status": status }))
            }
            Self::TokenParseFailed {
                status,
                content_type,
                body_snippet,
            } => Some(json!({
                "status": status,
                "contentType": content_type,
                "bodySnippet": body_snippet,
            })),
            Self::RemoteQueryFailed {
                resource_type,
                status,
                content_type,
                body_snippet,
            } => Some(json!({
                "resourceType": resource_type,
                "status": status,
                "contentType": content_type,
                "bodySnippet": body_snippet,
            })),
            Self::RemoteResponseNotJson {
                resource_type,
                content_type,
                body_snippet,
            } => Some(json!({
                "resourceType": resource_type,
                "contentType": content_type,
                "bodySnippet": body_snippet,
            })),
            Self::RemoteOperationFailed {
                operation, target, ..
            } => Some(json!({ "operation": operation, "target": target })),
            Self::FieldNotAllowed { field }
            | Self::FilterFieldNotAllowed { field }
            | Self::InvalidInClause { field } => Some(json!({ "field": field })),
            Self::TenantsLoadFailed { path, reason }
            | Self::TenantsWriteFailed { path, reason } => {
                Some(json!({ "filePath": path, "error": reason }))
            }
            _ => None,
        }
    }

    /// Whether retrying the same call may succeed without intervention.
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Upstream(_))
    }

    /// Deterministic errors carry a stable contract (code + details) and map
    /// to protocol errors preserving it; anything else is surfaced as a
    /// generic application failure.
    pub fn is_deterministic(&self) -> bool {
        !matches!(
            self,
            Self::Upstream(_) | Self::Json(_) | Self::Io(_) | Self::Internal(_)
        )
    }

    /// Payload attached as JSON-RPC `error.data` for deterministic errors.
    pub fn rpc_data(&self) -> Value {
        json!({
            "code": self.code(),
            "details": self.details(),
            "retryable": self.retryable(),
        })
    }
}
