//! Best-effort field extraction over untyped response payloads.
//!
//! The portal's schemas drift between client versions, so decoding is
//! deliberately permissive: an absent or mistyped field degrades to its zero
//! value and never aborts decoding of sibling fields. Callers that need
//! stricter validation layer it on top of the typed records.

use serde_json::Value;

/// String field, or `""` when absent or not a string.
pub fn str_field(v: &Value, key: &str) -> String {
    v.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Boolean field, or `false` when absent or not a boolean.
pub fn bool_field(v: &Value, key: &str) -> bool {
    v.get(key).and_then(Value::as_bool).unwrap_or_default()
}

/// Integer field, or `0` when absent or not an integer.
pub fn i64_field(v: &Value, key: &str) -> i64 {
    v.get(key).and_then(Value::as_i64).unwrap_or_default()
}

/// List field, or an empty slice when absent or not an array.
/// Source order is preserved.
pub fn list_field<'a>(v: &'a Value, key: &str) -> &'a [Value] {
    v.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// List of strings; non-string elements degrade to `""`.
pub fn str_list_field(v: &Value, key: &str) -> Vec<String> {
    list_field(v, key)
        .iter()
        .map(|item| item.as_str().unwrap_or_default().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields_degrade_to_zero_values() {
        let v = json!({});

        assert_eq!(str_field(&v, "name"), "");
        assert!(!bool_field(&v, "flag"));
        assert_eq!(i64_field(&v, "count"), 0);
        assert!(list_field(&v, "items").is_empty());
        assert!(str_list_field(&v, "items").is_empty());
    }

    #[test]
    fn test_mistyped_fields_degrade_to_zero_values() {
        let v = json!({"name": 7, "flag": "yes", "count": "3", "items": {}});

        assert_eq!(str_field(&v, "name"), "");
        assert!(!bool_field(&v, "flag"));
        assert_eq!(i64_field(&v, "count"), 0);
        assert!(list_field(&v, "items").is_empty());
    }

    #[test]
    fn test_present_fields_come_through() {
        let v = json!({"name": "floor 1", "flag": true, "count": 42});

        assert_eq!(str_field(&v, "name"), "floor 1");
        assert!(bool_field(&v, "flag"));
        assert_eq!(i64_field(&v, "count"), 42);
    }

    #[test]
    fn test_list_order_preserved() {
        let v = json!({"ids": ["b", "a", "c"]});
        assert_eq!(str_list_field(&v, "ids"), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_mixed_list_keeps_shape() {
        let v = json!({"ids": ["a", 2, "c"]});
        assert_eq!(str_list_field(&v, "ids"), vec!["a", "", "c"]);
    }
}
