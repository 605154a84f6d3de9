//! Transport layer: the JSON-RPC envelope contract, protocol dispatch, and
//! the HTTP server that carries both the tool protocol and the admin REST
//! surface.

pub mod dispatch;
pub mod http;
pub mod jsonrpc;

pub use dispatch::{dispatch, resolve_tenant_id};
pub use http::{router, serve};
pub use jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, parse_envelope};
