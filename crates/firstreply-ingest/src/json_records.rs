// SPDX-FileCopyrightText: 2026 Firstreply Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON message exports.
//!
//! Accepts a top-level array of records, or an object whose `data` field is
//! that array. Array elements that are not record objects are kept as empty
//! records so that validation skips and counts them.

use firstreply_core::{FirstReplyError, MessageRecord};
use serde_json::Value;
use tracing::debug;

/// Parse a JSON document into boundary records.
pub fn parse_json(content: &str) -> Result<Vec<MessageRecord>, FirstReplyError> {
    let document: Value = serde_json::from_str(content).map_err(|e| FirstReplyError::Input {
        message: format!("invalid JSON: {e}"),
        source: Some(Box::new(e)),
    })?;

    let items = match document {
        Value::Array(items) => items,
        Value::Object(mut object) => match object.remove("data") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(FirstReplyError::MalformedInput {
                    message: "JSON object has no `data` array of records".to_string(),
                });
            }
        },
        other => {
            return Err(FirstReplyError::MalformedInput {
                message: format!("expected an array of records, found {}", kind(&other)),
            });
        }
    };

    Ok(items
        .into_iter()
        .enumerate()
        .map(|(position, item)| {
            serde_json::from_value(item).unwrap_or_else(|e| {
                debug!(position, error = %e, "unreadable JSON record");
                MessageRecord::default()
            })
        })
        .collect())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
