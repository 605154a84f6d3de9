//! OSLC domain: everything that talks the remote system's dialect.
//!
//! - `auth` - per-tenant outbound authorization headers
//! - `client` - the tenant-bound remote query client
//! - `filter` - structured-filter to native-dialect translation
//! - `schema` - TTL-bounded discovery cache of sampled field sets

pub mod auth;
pub mod client;
pub mod filter;
pub mod schema;

pub use client::{OperationTarget, OslcClient, QueryArgs, QueryPage};
pub use filter::{FilterOp, WhereClause, where_from_clauses};
pub use schema::{SchemaCache, SchemaShape};
