//! Secret reference resolution.
//!
//! Tenant records never embed OAuth or basic-auth secrets directly; they
//! carry references resolved at call time. Resolution is deliberately
//! infallible: a missing variable or unreadable file yields an empty string,
//! and the auth layer decides what an empty credential means.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A reference to secret material held outside the tenant record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SecretRef {
    /// Value of an environment variable.
    Env {
        /// Variable name.
        name: String,
    },
    /// Trimmed contents of a file (e.g. a mounted secret volume).
    File {
        /// Path to the file.
        path: String,
    },
}

/// Resolve a secret reference to its value.
///
/// Returns an empty string when the reference cannot be resolved.
pub fn resolve_secret(secret: &SecretRef) -> String {
    match secret {
        SecretRef::Env { name } => {
            let key = name.trim();
            if key.is_empty() {
                return String::new();
            }
            std::env::var(key).unwrap_or_default()
        }
        SecretRef::File { path } => {
            let p = path.trim();
            if p.is_empty() {
                return String::new();
            }
            std::fs::read_to_string(p)
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        }
    }
}
