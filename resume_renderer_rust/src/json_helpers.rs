//! Helper functions for safe JSON access
//!
//! Resume rows come from an external store with loosely typed columns, so
//! every accessor here is forgiving: a missing or mistyped key is `None`.

use serde_json::Value;

/// Safely get an optional string value
pub fn get_str_opt<'a>(obj: &'a Value, key: &str) -> Option<&'a str> {
    obj.get(key).and_then(|v| v.as_str())
}

/// First string value found under any of `keys` (e.g. snake_case then camelCase)
pub fn get_str_any<'a>(obj: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| get_str_opt(obj, key))
}

/// Like `get_str_any`, trimmed, with empty strings treated as absent
pub fn get_text_any(obj: &Value, keys: &[&str]) -> Option<String> {
    get_str_any(obj, keys)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Scalar JSON value rendered as text (strings, numbers, booleans)
///
/// Objects, arrays and null have no textual form and yield `None`.
pub fn scalar_to_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_str_any_prefers_first_key() {
        let v = json!({"start_date": "2020", "startDate": "2021"});
        assert_eq!(get_str_any(&v, &["start_date", "startDate"]), Some("2020"));
        assert_eq!(get_str_any(&v, &["end_date", "endDate"]), None);
    }

    #[test]
    fn test_get_text_any_skips_blank() {
        let v = json!({"fluency": "   "});
        assert_eq!(get_text_any(&v, &["fluency"]), None);
    }

    #[test]
    fn test_scalar_to_text() {
        assert_eq!(scalar_to_text(&json!(" Rust ")), Some("Rust".to_string()));
        assert_eq!(scalar_to_text(&json!(42)), Some("42".to_string()));
        assert_eq!(scalar_to_text(&json!({"a": 1})), None);
        assert_eq!(scalar_to_text(&json!("")), None);
    }
}
