//! Tools domain: the fixed catalog of named operations.
//!
//! - `definitions/` - individual tool implementations (one file per tool)
//! - `registry.rs` - catalog construction and name-based dispatch
//! - `context.rs` - tenant-scoped execution context

pub mod context;
pub mod definitions;
pub mod registry;

pub use context::ToolContext;
pub use registry::{ToolAnnotations, ToolRegistry, ToolSpec};
