// Helpers for walking Yahoo's JSON payloads.
//
// Yahoo encodes collections as objects keyed by stringified indexes plus a
// `count` field, and scatters an entity's attributes over an array of
// single-key objects whose positions differ between entities. Nothing here
// assumes a fixed position; every lookup scans.

use serde_json::Value;

use crate::error::LeagueError;

/// Entries of a collection object (`{"0": .., "1": .., "count": N}`) in
/// index order. An array is treated as an already ordered collection, which
/// is how Yahoo encodes an empty result (`[]`).
pub fn collection_entries(collection: &Value) -> Vec<&Value> {
    match collection {
        Value::Object(map) => {
            let mut entries: Vec<(usize, &Value)> = map
                .iter()
                .filter_map(|(key, value)| key.parse::<usize>().ok().map(|i| (i, value)))
                .collect();
            entries.sort_by_key(|(i, _)| *i);
            entries.into_iter().map(|(_, value)| value).collect()
        }
        Value::Array(items) => items.iter().collect(),
        _ => Vec::new(),
    }
}

/// Scan an attribute array (or a single object) for the first object that
/// carries `key` and return that key's value.
pub fn find_attr<'a>(items: &'a Value, key: &str) -> Option<&'a Value> {
    match items {
        Value::Array(entries) => entries.iter().find_map(|entry| find_attr(entry, key)),
        Value::Object(map) => map.get(key),
        _ => None,
    }
}

/// Like [`find_attr`], failing with `FieldNotFound` when the key is absent.
pub fn require_attr<'a>(items: &'a Value, key: &str) -> Result<&'a Value, LeagueError> {
    find_attr(items, key).ok_or_else(|| LeagueError::FieldNotFound(key.to_string()))
}

/// Direct child lookup on an object.
pub fn field<'a>(value: &'a Value, key: &str) -> Result<&'a Value, LeagueError> {
    value
        .get(key)
        .ok_or_else(|| LeagueError::FieldNotFound(key.to_string()))
}

/// `fantasy_content`, the envelope every response is wrapped in.
pub fn content(response: &Value) -> Result<&Value, LeagueError> {
    field(response, "fantasy_content")
}

/// Render a scalar as text. Yahoo mixes numbers and numeric strings for the
/// same field depending on the resource.
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Text of `key` within an attribute array, failing if absent or non-scalar.
pub fn require_text(items: &Value, key: &str) -> Result<String, LeagueError> {
    let value = require_attr(items, key)?;
    as_text(value).ok_or_else(|| LeagueError::InvalidValue {
        field: key.to_string(),
        value: value.to_string(),
    })
}

/// Non-negative integer from a number or numeric string.
pub fn as_count(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n.as_u64().map(|n| n as usize),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Truthy flag encoded as `1`, `"1"` or `true`.
pub fn as_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_u64() == Some(1),
        Value::String(s) => s.trim() == "1",
        _ => false,
    }
}

/// A stat value that was not observed this season (`"-"`, or blank).
pub fn is_unobserved(text: &str) -> bool {
    let text = text.trim();
    text.is_empty() || text == "-"
}
