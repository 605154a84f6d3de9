//! Structured-filter to native-dialect translation.
//!
//! Tools accept an ordered list of `{field, op, value}` clauses and the
//! translator renders them into the remote system's string dialect as a flat
//! conjunction. Field allowlisting happens in the tool layer before
//! translation; this module is schema-agnostic.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::{GatewayError, Result};

/// Comparison operator of a filter clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum FilterOp {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "like")]
    Like,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "null")]
    IsNull,
    #[serde(rename = "notnull")]
    NotNull,
}

impl FilterOp {
    fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Like => "like",
            Self::In => "in",
            Self::IsNull => "null",
            Self::NotNull => "notnull",
        }
    }
}

/// One structured filter clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WhereClause {
    /// Field name, validated against the discovered schema by the caller.
    pub field: String,
    /// Comparison operator.
    pub op: FilterOp,
    /// Comparison value; ignored by `null`/`notnull`, required array for `in`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Render one literal in the native dialect.
///
/// Numbers and booleans are bare tokens, null/absent is the bare token
/// `null`, and everything else becomes a single-quoted string with internal
/// quotes doubled.
pub fn escape_literal(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "null".to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::String(s)) => format!("'{}'", s.replace('\'', "''")),
        Some(other) => format!("'{}'", other.to_string().replace('\'', "''")),
    }
}

/// Translate clauses into the native filter string.
///
/// Clauses appear in input order joined by ` and `; this dialect supports a
/// flat conjunction only. Clauses with an empty field are skipped.
pub fn where_from_clauses(clauses: &[WhereClause]) -> Result<String> {
    let mut parts = Vec::with_capacity(clauses.len());
    for clause in clauses {
        let field = clause.field.trim();
        if field.is_empty() {
            continue;
        }
        match clause.op {
            FilterOp::IsNull => parts.push(format!("{field} is null")),
            FilterOp::NotNull => parts.push(format!("{field} is not null")),
            FilterOp::In => {
                let Some(Value::Array(values)) = &clause.value else {
                    return Err(GatewayError::InvalidInClause {
                        field: field.to_string(),
                    });
                };
                let rendered: Vec<String> =
                    values.iter().map(|v| escape_literal(Some(v))).collect();
                parts.push(format!("{field} in [{}]", rendered.join(",")));
            }
            FilterOp::Like => {
                parts.push(format!("{field} like {}", escape_literal(clause.value.as_ref())));
            }
            op => {
                parts.push(format!(
                    "{field} {} {}",
                    op.symbol(),
                    escape_literal(clause.value.as_ref())
                ));
            }
        }
    }
    Ok(parts.join(" and "))
}
