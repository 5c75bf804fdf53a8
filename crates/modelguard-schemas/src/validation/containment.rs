//! Substring and element containment helpers
//!
//! Copyright (c) 2025 Modelguard Team
//! Licensed under the Apache-2.0 license

use crate::value::Value;

/// How containment is tested
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContainmentOptions {
    /// Compare compact JSON text of haystack and needle instead of raw content
    pub stringify: bool,
}

impl ContainmentOptions {
    pub fn stringified() -> Self {
        Self { stringify: true }
    }
}

/// `true` if `haystack` contains `needle`.
///
/// With `stringify`, the JSON text of the needle must occur in the JSON text
/// of the haystack. Without it, strings are searched for the needle's text and
/// arrays for an equal element; other haystacks fall back to JSON text.
pub fn includes(haystack: &Value, needle: &Value, options: ContainmentOptions) -> bool {
    if options.stringify {
        return haystack.stringify().contains(&needle.stringify());
    }

    match haystack {
        Value::String(text) => text.contains(&needle.to_text()),
        Value::Array(items) => items.contains(needle),
        other => other.stringify().contains(&needle.stringify()),
    }
}

/// `true` if `haystack` contains at least one of `needles`
pub fn includes_any(haystack: &Value, needles: &[Value], options: ContainmentOptions) -> bool {
    if options.stringify {
        let text = haystack.stringify();
        return needles.iter().any(|needle| text.contains(&needle.stringify()));
    }

    needles.iter().any(|needle| includes(haystack, needle, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_substring() {
        let haystack = Value::from("hello world");
        assert!(includes(&haystack, &Value::from("lo w"), ContainmentOptions::default()));
        assert!(!includes(&haystack, &Value::from("xyz"), ContainmentOptions::default()));
        assert!(includes_any(
            &haystack,
            &[Value::from("nope"), Value::from("world")],
            ContainmentOptions::default()
        ));
    }

    #[test]
    fn test_array_elements() {
        let haystack = Value::from(json!([1, "two", {"a": 3}]));
        assert!(includes(&haystack, &Value::from("two"), ContainmentOptions::default()));
        assert!(includes(&haystack, &Value::from(json!({"a": 3})), ContainmentOptions::default()));
        assert!(!includes(&haystack, &Value::from("tw"), ContainmentOptions::default()));
    }

    #[test]
    fn test_stringified_containment() {
        let haystack = Value::from(json!({"role": "admin", "tags": ["a", "b"]}));
        let options = ContainmentOptions::stringified();
        assert!(includes(&haystack, &Value::from("admin"), options));
        assert!(includes(&haystack, &Value::from(json!(["a", "b"])), options));
        assert!(!includes(&haystack, &Value::from("root"), options));
        assert!(includes_any(&haystack, &[Value::from("root"), Value::from("b")], options));
    }

    #[test]
    fn test_empty_needles_never_match() {
        let haystack = Value::from("anything");
        assert!(!includes_any(&haystack, &[], ContainmentOptions::default()));
        assert!(!includes_any(&haystack, &[], ContainmentOptions::stringified()));
    }
}
