//! Gateway entry point.
//!
//! Initializes logging, loads configuration and the tenant store, builds
//! the tool registry, and starts the HTTP transport.

use std::sync::Arc;

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use eam_mcp_gateway::core::AppConfig;
use eam_mcp_gateway::core::transport;
use eam_mcp_gateway::domains::tenants::TenantStore;
use eam_mcp_gateway::domains::tools::ToolRegistry;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    init_logging(&config.log_level);

    info!(
        "Starting eam-mcp-gateway v{} on {}:{}",
        env!("CARGO_PKG_VERSION"),
        config.host,
        config.port
    );

    let tenants = Arc::new(TenantStore::load(&config.tenants_file)?);
    let registry = Arc::new(ToolRegistry::new(Arc::new(config), tenants));

    transport::serve(registry).await?;

    info!("Server shutting down");
    Ok(())
}

/// Initialize the logging subsystem.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
