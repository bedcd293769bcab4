//! Shared utility functions for working with loosely-typed JSON.
//!
//! ## JSON Extraction Helpers
//!
//! Ergonomic helpers for pulling values out of `serde_json::Value` without
//! failing on unexpected shapes:
//! - `json_string` - trimmed, non-empty strings
//! - `json_positive_numbers` - arrays of positive finite numbers

use serde_json::Value;

// =============================================================================
// JSON Value Extraction Helpers
// =============================================================================

/// Extract a trimmed, non-empty string by key.
#[inline]
pub fn json_string(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Extract positive finite numbers from an array by key, skipping anything else.
pub fn json_positive_numbers(value: &Value, key: &str) -> Vec<f64> {
    value
        .get(key)
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_f64)
                .filter(|n| n.is_finite() && *n > 0.0)
                .collect()
        })
        .unwrap_or_default()
}

/// A value counts as missing when absent, null, an empty array, or a blank string.
pub fn is_missing_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

// =============================================================================
// String Utilities
// =============================================================================

/// First `max_chars` characters of a string, for log-safe previews.
pub fn preview(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_chars).collect::<String>())
    }
}
