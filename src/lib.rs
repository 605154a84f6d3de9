//! EAM MCP Gateway Library
//!
//! A multi-tenant tool-dispatch gateway for OSLC-based enterprise asset
//! management APIs. Named operations are exposed over a JSON-RPC protocol
//! and executed against each tenant's remote system by translating
//! structured, allowlisted query descriptions into the native query dialect.
//!
//! # Architecture
//!
//! - **core**: configuration, the unified error type, secret resolution,
//!   and the transport layer (JSON-RPC envelope + HTTP server)
//! - **domains**: business logic organized by bounded contexts
//!   - **tenants**: tenant configuration records and their backing store
//!   - **oslc**: auth strategy, remote query client, query translation,
//!     and the schema-discovery cache
//!   - **tools**: the fixed tool catalog, registry, and dispatch context
//!
//! Every tool invocation flows dispatch → tenant resolution → auth →
//! (possibly) schema lookup → query translation → remote call → response
//! normalization.

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use crate::core::{AppConfig, GatewayError, Result};
pub use crate::domains::tools::ToolRegistry;
