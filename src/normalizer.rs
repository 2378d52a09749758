//! Comma-text to JSON array normalization
//!
//! Legacy rows store list columns as `"a, b, c"`, as an empty string, or as
//! NULL. The normalizer turns all of them into JSON array text while leaving
//! values that already look like an array untouched.

use std::borrow::Cow;

use serde_json::Value;

/// Encoded empty array
pub const EMPTY_ARRAY: &str = "[]";

/// Result of normalizing a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub value: String,
    /// Whether `value` differs from the stored input
    pub changed: bool,
}

/// Normalize a list column value into JSON array text.
///
/// - `None` and `""` become `[]`.
/// - Values starting with `[` pass through unchanged; they are not validated.
/// - Anything else is split on `,`, each segment trimmed, empty segments
///   dropped, and the rest encoded as a JSON array of strings.
pub fn normalize(input: Option<&str>) -> Normalized {
    let Some(raw) = input else {
        return Normalized {
            value: EMPTY_ARRAY.to_string(),
            changed: true,
        };
    };

    if raw.starts_with('[') {
        return Normalized {
            value: raw.to_string(),
            changed: false,
        };
    }

    let value = encode_array(&split_list(raw));
    let changed = value != raw;
    Normalized { value, changed }
}

/// Decode a value read from a list column through `CAST(.. AS CHAR)`.
///
/// A `JSON` column can only hold legacy text as a JSON string scalar, so a
/// value that parses as a string yields its contents. JSON `null` is treated
/// like SQL NULL. Anything else is returned as stored.
pub fn decode_stored(stored: Option<&str>) -> Option<Cow<'_, str>> {
    let raw = stored?;
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Null) => None,
        Ok(Value::String(text)) => Some(Cow::Owned(text)),
        _ => Some(Cow::Borrowed(raw)),
    }
}

/// Normalize a stored column value; `changed` compares against what is stored
pub fn normalize_stored(stored: Option<&str>) -> Normalized {
    let decoded = decode_stored(stored);
    let value = normalize(decoded.as_deref()).value;
    let changed = stored != Some(value.as_str());
    Normalized { value, changed }
}

/// Split comma-joined text into trimmed, non-empty segments
pub fn split_list(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Encode a list of strings as compact JSON array text
pub fn encode_array<S: AsRef<str>>(items: &[S]) -> String {
    let items: Vec<&str> = items.iter().map(AsRef::as_ref).collect();
    // Serializing a list of strings cannot fail
    serde_json::to_string(&items).unwrap_or_else(|_| EMPTY_ARRAY.to_string())
}

/// Check whether text parses as JSON
pub fn is_valid_json(raw: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(raw).is_ok()
}
