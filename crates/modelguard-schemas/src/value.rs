//! Dynamic values checked by the validator
//!
//! [`Value`] mirrors `serde_json::Value` and adds a [`Value::Function`]
//! variant so that callables can be validated (`type: function`) and passed
//! through the function-call wrapper. Objects keep insertion order.
//!
//! Copyright (c) 2025 Modelguard Team
//! Licensed under the Apache-2.0 license

use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Number;
use std::fmt;
use std::sync::Arc;

/// Insertion-ordered object map
pub type Map = IndexMap<String, Value>;

type CallableFn = dyn Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync;

/// A shared, invocable function value
#[derive(Clone)]
pub struct Callable(Arc<CallableFn>);

impl Callable {
    /// Wrap a closure taking positional arguments
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invoke the function
    pub fn call(&self, args: &[Value]) -> anyhow::Result<Value> {
        (self.0)(args)
    }

    /// Identity comparison: two callables are equal only if they share the closure
    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callable(..)")
    }
}

/// A dynamically typed value
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Value>),
    Object(Map),
    Function(Callable),
}

impl Value {
    /// Build a function value from a closure
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Value::Function(Callable::new(f))
    }

    /// Runtime type name used in messages: `null`, `boolean`, `number`,
    /// `string`, `array`, `object` or `function`
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    /// `null`, `false`, zero and the empty string are falsy
    pub fn is_falsy(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
            Value::String(s) => s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Function(_) => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Look up an object key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Convert to a JSON value. Functions become `null`, and object entries
    /// holding functions are dropped.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null | Value::Function(_) => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(map) => serde_json::Value::Object(
                map.iter()
                    .filter(|(_, v)| !v.is_function())
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Compact JSON text of this value
    pub fn stringify(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Text used when a value is quoted in a message or searched as a
    /// substring: strings as-is, numbers in decimal form, everything else as
    /// compact JSON
    pub fn to_text(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Number(n) => number_text(n),
            Value::Function(_) => "[function]".to_string(),
            other => other.stringify(),
        }
    }
}

/// String form of a number: integers without a fraction, floats in their
/// shortest round-trip form (`1.0` prints as `1`).
///
/// Magnitudes of at least `1e21` or below `1e-6` switch to exponent form with
/// a signed exponent (`1e+21`, `1.5e-7`), so the `decimals` count and `regEx`
/// see the same text a JavaScript runtime would produce.
pub fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() => float_text(f),
        _ => n.to_string(),
    }
}

fn float_text(f: f64) -> String {
    let magnitude = f.abs();
    if !f.is_finite() || f == 0.0 || (1e-6..1e21).contains(&magnitude) {
        return f.to_string();
    }

    let text = format!("{:e}", f);
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => format!("{}e+{}", mantissa, exponent),
        _ => text,
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    a.as_f64() == b.as_f64()
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Function(_) => f.write_str("[function]"),
            other => f.write_str(&other.stringify()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null | Value::Function(_) => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => items.serialize(serializer),
            Value::Object(map) => {
                let mut out = serializer.serialize_map(None)?;
                for (key, value) in map.iter().filter(|(_, v)| !v.is_function()) {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n.into())
    }
}

impl From<f64> for Value {
    /// Non-finite floats have no JSON form and become `null`
    fn from(f: f64) -> Self {
        Number::from_f64(f).map_or(Value::Null, Value::Number)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl From<Callable> for Value {
    fn from(f: Callable) -> Self {
        Value::Function(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_falsy_values() {
        assert!(Value::Null.is_falsy());
        assert!(Value::from(false).is_falsy());
        assert!(Value::from(0).is_falsy());
        assert!(Value::from(0.0).is_falsy());
        assert!(Value::from("").is_falsy());

        assert!(!Value::from(true).is_falsy());
        assert!(!Value::from(-1).is_falsy());
        assert!(!Value::from("0").is_falsy());
        assert!(!Value::from(json!([])).is_falsy());
        assert!(!Value::from(json!({})).is_falsy());
        assert!(!Value::function(|_| Ok(Value::Null)).is_falsy());
    }

    #[test]
    fn test_numbers_compare_by_value() {
        assert_eq!(Value::from(0), Value::from(0.0));
        assert_eq!(Value::from(json!(5)), Value::from(5.0));
        assert_ne!(Value::from(1), Value::from(1.5));
    }

    #[test]
    fn test_functions_compare_by_identity() {
        let f = Callable::new(|_| Ok(Value::Null));
        let g = Callable::new(|_| Ok(Value::Null));
        assert_eq!(Value::Function(f.clone()), Value::Function(f.clone()));
        assert_ne!(Value::Function(f), Value::Function(g));
    }

    #[test]
    fn test_stringify_keeps_insertion_order_and_drops_functions() {
        let mut map = Map::new();
        map.insert("b".to_string(), Value::from(1));
        map.insert("a".to_string(), Value::from("x"));
        map.insert("f".to_string(), Value::function(|_| Ok(Value::Null)));
        let value = Value::Object(map);
        assert_eq!(value.stringify(), r#"{"b":1,"a":"x"}"#);

        let array = Value::Array(vec![Value::from(1), Value::function(|_| Ok(Value::Null))]);
        assert_eq!(array.stringify(), "[1,null]");
    }

    #[test]
    fn test_number_text() {
        assert_eq!(number_text(&Number::from(1234)), "1234");
        assert_eq!(number_text(&Number::from_f64(1.333).unwrap()), "1.333");
        assert_eq!(number_text(&Number::from_f64(2.0).unwrap()), "2");
        assert_eq!(number_text(&Number::from_f64(0.000001).unwrap()), "0.000001");
        assert_eq!(number_text(&Number::from_f64(1e20).unwrap()), "100000000000000000000");
    }

    #[test]
    fn test_number_text_exponent_form() {
        assert_eq!(number_text(&Number::from_f64(1e-7).unwrap()), "1e-7");
        assert_eq!(number_text(&Number::from_f64(-1.5e-7).unwrap()), "-1.5e-7");
        assert_eq!(number_text(&Number::from_f64(1e21).unwrap()), "1e+21");
        assert_eq!(number_text(&Number::from_f64(2.5e30).unwrap()), "2.5e+30");
    }

    #[test]
    fn test_round_trip_through_json() {
        let json = json!({"a": [1, "two", null, true], "b": {"c": 1.5}});
        let value = Value::from(json.clone());
        assert_eq!(value.to_json(), json);
        assert_eq!(value.get("b").and_then(|b| b.get("c")), Some(&Value::from(1.5)));
    }
}
