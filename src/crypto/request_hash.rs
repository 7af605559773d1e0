//! Request body canonicalization and hashing
//!
//! Wallet tokens bind the request body through a SHA-256 digest. Client and
//! server must agree on the exact bytes, so the body is encoded as compact
//! JSON with object keys sorted at every nesting level, and the digest is
//! rendered as lowercase hex.

use crate::{AuthError, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Recursively sort object keys
pub fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<&String, Value> =
                map.iter().map(|(key, value)| (key, sort_keys(value))).collect();

            let mut out = Map::new();
            for (key, value) in sorted {
                out.insert(key.clone(), value);
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

/// Canonical JSON text for a request body
pub fn canonical_json(body: &Map<String, Value>) -> Result<String> {
    let sorted = sort_keys(&Value::Object(body.clone()));
    serde_json::to_string(&sorted)
        .map_err(|e| AuthError::jwt_generation_with("Failed to serialize request body", e))
}

/// SHA-256 digest as lowercase hex
pub fn sha256_hex(input: impl AsRef<[u8]>) -> String {
    hex::encode(Sha256::digest(input.as_ref()))
}

/// Digest embedded as the `reqHash` claim
pub fn request_hash(body: &Map<String, Value>) -> Result<String> {
    Ok(sha256_hex(canonical_json(body)?))
}

/// Whether the body has anything worth binding: at least one non-null value
pub fn has_request_data(body: &Map<String, Value>) -> bool {
    body.values().any(|value| !value.is_null())
}

/// Convert an arbitrary request payload into the key-value mapping that gets hashed.
///
/// `null` maps to an empty body; anything that does not serialize to a JSON
/// object is rejected.
pub fn to_request_map<T>(body: &T) -> Result<Map<String, Value>>
where
    T: Serialize + ?Sized,
{
    match to_body_value(body)? {
        Value::Null => Ok(Map::new()),
        Value::Object(map) => Ok(map),
        other => Err(AuthError::validation(
            "requestBody",
            format!("must serialize to a JSON object, got {}", json_kind(&other)),
        )),
    }
}

/// Serialize a request payload into a JSON value
pub fn to_body_value<T>(body: &T) -> Result<Value>
where
    T: Serialize + ?Sized,
{
    serde_json::to_value(body)
        .map_err(|e| AuthError::validation("requestBody", format!("failed to serialize: {}", e)))
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
