//! Configuration management for the gateway.
//!
//! All knobs are environment-driven with sensible defaults, so the server
//! can boot with no configuration at all (an empty tenant store and the
//! default catalog limits).

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Main configuration structure for the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port the HTTP transport listens on.
    pub port: u16,

    /// Host address the HTTP transport binds to.
    pub host: String,

    /// Path to the tenants JSON file.
    pub tenants_file: String,

    /// Name of the HTTP header carrying the effective tenant id.
    pub tenant_header: String,

    /// Whether the admin REST surface may persist tenant changes.
    pub config_write_enabled: bool,

    /// Whether the approval workflow is enabled (disabled scaffolding).
    pub approvals_enabled: bool,

    /// Maximum number of tools returned by the catalog listing.
    pub tool_catalog_limit: usize,

    /// Default schema-discovery TTL in seconds, overridable per tenant.
    pub metadata_ttl_seconds_default: u64,

    /// Log level filter (e.g. "info", "debug").
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            tenants_file: "/etc/eam-mcp/tenants.json".to_string(),
            tenant_header: "x-tenant-id".to_string(),
            config_write_enabled: true,
            approvals_enabled: false,
            tool_catalog_limit: 128,
            metadata_ttl_seconds_default: 3600,
            log_level: "info".to_string(),
        }
    }
}

fn env_bool(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(v) => {
            let v = v.trim().to_lowercase();
            if v.is_empty() {
                default
            } else {
                matches!(v.as_str(), "1" | "true" | "yes" | "y" | "on")
            }
        }
        Err(_) => default,
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    match std::env::var(name) {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(v) if v > 0 => v,
            _ => {
                if !raw.trim().is_empty() {
                    warn!("Ignoring invalid {}={:?}, using {}", name, raw, default);
                }
                default
            }
        },
        Err(_) => default,
    }
}

impl AppConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.port = env_u64("PORT", u64::from(config.port)).min(u64::from(u16::MAX)) as u16;

        if let Ok(host) = std::env::var("HTTP_HOST") {
            if !host.trim().is_empty() {
                config.host = host.trim().to_string();
            }
        }

        if let Ok(path) = std::env::var("TENANTS_FILE") {
            if !path.trim().is_empty() {
                config.tenants_file = path.trim().to_string();
            }
        }

        if let Ok(header) = std::env::var("TENANT_HEADER") {
            if !header.trim().is_empty() {
                config.tenant_header = header.trim().to_lowercase();
            }
        }

        config.config_write_enabled = env_bool("CONFIG_WRITE_ENABLED", true);
        config.approvals_enabled = env_bool("APPROVALS_ENABLED", false);
        config.tool_catalog_limit = env_u64("TOOL_CATALOG_LIMIT", 128).max(1) as usize;
        config.metadata_ttl_seconds_default = env_u64("METADATA_TTL_SECONDS", 3600);

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            if !level.trim().is_empty() {
                config.log_level = level.trim().to_string();
            }
        }

        config
    }
}
