//! # Text Codec
//!
//! Boundary between JSON text and the value model. Blank input means "no
//! value" and parses to `Ok(None)`; roots of the wrong shape are rejected
//! before any engine sees them.

use thiserror::Error;

use crate::document::Document;
use crate::value::{self, Value};

/// Failure converting between text and values.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The text is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON is valid but has the wrong shape.
    #[error("expected {expected} at {location}, found {found}")]
    UnexpectedShape {
        /// Required kind.
        expected: &'static str,
        /// Where it was required (`root`, `[3]`).
        location: String,
        /// Kind actually present.
        found: &'static str,
    },
}

/// Parse a single document. Blank text yields `Ok(None)`.
pub fn parse_object(text: &str) -> Result<Option<Document>, CodecError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let value: Value = serde_json::from_str(text)?;
    match value {
        Value::Object(object) => Ok(Some(Document::new(object))),
        other => Err(CodecError::UnexpectedShape {
            expected: "object",
            location: "root".to_string(),
            found: value::kind_name(&other),
        }),
    }
}

/// Parse a collection: an array of objects. Blank text yields `Ok(None)`.
pub fn parse_collection(text: &str) -> Result<Option<Vec<Document>>, CodecError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let value: Value = serde_json::from_str(text)?;
    documents_from_value(value).map(Some)
}

/// Split an already-parsed array into documents.
pub fn documents_from_value(value: Value) -> Result<Vec<Document>, CodecError> {
    let Value::Array(items) = value else {
        return Err(CodecError::UnexpectedShape {
            expected: "array",
            location: "root".to_string(),
            found: value::kind_name(&value),
        });
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(object) => Ok(Document::new(object)),
            other => Err(CodecError::UnexpectedShape {
                expected: "object",
                location: format!("[{i}]"),
                found: value::kind_name(&other),
            }),
        })
        .collect()
}

/// Print a value, keeping key order and number text.
pub fn to_text(value: &Value, pretty: bool) -> Result<String, CodecError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}
