//! Persisted format for the link collection
//!
//! The collection is written as a versioned JSON envelope:
//!
//! ```json
//! { "version": 1, "links": [ { "id": "...", "itemId": "...", ... } ] }
//! ```
//!
//! A bare JSON array of records (the unversioned browser format) is still
//! accepted on load and upgraded on the next write.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{StorageError, StorageResult};
use crate::models::ShareableLink;

/// Current format version
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    links: &'a [ShareableLink],
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    #[serde(default)]
    links: Vec<ShareableLink>,
}

/// Serialize the full collection
pub fn encode(links: &[ShareableLink]) -> StorageResult<String> {
    serde_json::to_string(&EnvelopeRef {
        version: FORMAT_VERSION,
        links,
    })
    .map_err(|e| StorageError::InvalidFormat(e.to_string()))
}

/// Parse a stored collection
pub fn decode(text: &str) -> StorageResult<Vec<ShareableLink>> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| StorageError::InvalidFormat(e.to_string()))?;

    match value {
        Value::Array(_) => {
            serde_json::from_value(value).map_err(|e| StorageError::InvalidFormat(e.to_string()))
        }
        Value::Object(_) => {
            let envelope: Envelope = serde_json::from_value(value)
                .map_err(|e| StorageError::InvalidFormat(e.to_string()))?;
            if envelope.version != FORMAT_VERSION {
                return Err(StorageError::UnsupportedVersion {
                    found: envelope.version,
                    expected: FORMAT_VERSION,
                });
            }
            Ok(envelope.links)
        }
        other => Err(StorageError::InvalidFormat(format!(
            "expected an object or array, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
