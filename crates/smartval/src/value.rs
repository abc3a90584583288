//! Helpers for inspecting untyped input values.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

static NUMERIC_REGEX: OnceLock<Regex> = OnceLock::new();

fn numeric_regex() -> &'static Regex {
    NUMERIC_REGEX.get_or_init(|| {
        Regex::new(r"^\s*[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?\s*$").unwrap()
    })
}

/// Whether `text` is a complete decimal number literal, optionally padded
/// with whitespace.
pub fn is_numeric_str(text: &str) -> bool {
    numeric_regex().is_match(text)
}

/// Numbers and numeric strings. Booleans are not numeric.
pub fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => is_numeric_str(s),
        _ => false,
    }
}

/// Numeric reading of a number or numeric string.
pub fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if is_numeric_str(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Textual form of a scalar. Arrays and objects have none.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) | Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Character count of a string value.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Short type label used in messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_strings() {
        for text in ["18", "-3", "+4.5", ".5", "1e3", " 42", "42 ", "7."] {
            assert!(is_numeric_str(text), "{text:?} should be numeric");
        }
        for text in ["", "abc", "12abc", "0x1A", "1e", "--1", "inf", "NaN"] {
            assert!(!is_numeric_str(text), "{text:?} should not be numeric");
        }
    }

    #[test]
    fn booleans_are_not_numeric() {
        assert!(!is_numeric(&json!(true)));
        assert!(is_numeric(&json!(1.5)));
        assert!(is_numeric(&json!("10")));
    }

    #[test]
    fn as_f64_reads_numeric_strings() {
        assert_eq!(as_f64(&json!(" 12.5 ")), Some(12.5));
        assert_eq!(as_f64(&json!(30)), Some(30.0));
        assert_eq!(as_f64(&json!("thirty")), None);
        assert_eq!(as_f64(&json!([1])), None);
    }

    #[test]
    fn scalar_text_follows_string_conversion() {
        assert_eq!(scalar_text(&json!(true)).as_deref(), Some("1"));
        assert_eq!(scalar_text(&json!(false)).as_deref(), Some(""));
        assert_eq!(scalar_text(&json!(42)).as_deref(), Some("42"));
        assert_eq!(scalar_text(&json!({"a": 1})), None);
    }

    #[test]
    fn char_len_counts_characters() {
        assert_eq!(char_len("héllo"), 5);
        assert_eq!(type_name(&json!(1.5)), "float");
        assert_eq!(type_name(&json!(1)), "integer");
    }
}
