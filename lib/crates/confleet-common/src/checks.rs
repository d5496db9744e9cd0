//! Validation check file format.
//!
//! A check document is an ordered sequence of single-key mappings
//! `{operation_name: expected_body}`. The body may carry two reserved keys:
//! `_name` overrides the label used in reports, and `_kwargs` is forwarded to
//! the named operation. Every other key is part of the expected-result
//! structure compared against the operation's actual output.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// One parsed validation check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckSpec {
    /// Operation (getter) name to invoke.
    pub operation: String,
    /// Report label: `_name` override, or the operation name.
    pub label: String,
    /// Arguments forwarded to the operation.
    pub kwargs: Map<String, Value>,
    /// Expected result structure (everything that was not a reserved key).
    pub expected: Value,
}

/// Errors raised while parsing a check document.
#[derive(Debug, Error)]
pub enum CheckParseError {
    #[error("check document must be a sequence of single-key mappings")]
    NotASequence,

    #[error("check entry {index} must be a mapping with exactly one key")]
    BadEntry { index: usize },

    #[error("check '{operation}': expected body must be a mapping")]
    BadBody { operation: String },

    #[error("check '{operation}': _name must be a string")]
    BadName { operation: String },

    #[error("check '{operation}': _kwargs must be a mapping")]
    BadKwargs { operation: String },
}

/// Parse a whole check document (already decoded into JSON values).
///
/// Order is preserved: checks run and report in document order.
pub fn parse_check_document(doc: &Value) -> Result<Vec<CheckSpec>, CheckParseError> {
    let entries = doc.as_array().ok_or(CheckParseError::NotASequence)?;
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_entry(index, entry))
        .collect()
}

fn parse_entry(index: usize, entry: &Value) -> Result<CheckSpec, CheckParseError> {
    let map = entry
        .as_object()
        .filter(|m| m.len() == 1)
        .ok_or(CheckParseError::BadEntry { index })?;
    // len() == 1 checked above
    let (operation, body) = map.iter().next().ok_or(CheckParseError::BadEntry { index })?;

    let mut body = body
        .as_object()
        .cloned()
        .ok_or_else(|| CheckParseError::BadBody {
            operation: operation.clone(),
        })?;

    let label = match body.remove("_name") {
        None => operation.clone(),
        Some(Value::String(s)) if !s.is_empty() => s,
        // An empty _name falls back to the operation name.
        Some(Value::String(_)) => operation.clone(),
        Some(_) => {
            return Err(CheckParseError::BadName {
                operation: operation.clone(),
            });
        }
    };

    let kwargs = match body.remove("_kwargs") {
        None => Map::new(),
        Some(Value::Object(m)) => m,
        Some(_) => {
            return Err(CheckParseError::BadKwargs {
                operation: operation.clone(),
            });
        }
    };

    Ok(CheckSpec {
        operation: operation.clone(),
        label,
        kwargs,
        expected: Value::Object(body),
    })
}
