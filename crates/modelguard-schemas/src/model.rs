//! Declarative models describing what a value must look like
//!
//! A [`Model`] is one of:
//! - a type shorthand such as `"string"`, equivalent to `{"type": "string"}`
//! - a full [`Spec`] with a `type` and constraint fields
//! - a union of models, satisfied when any member is satisfied
//!
//! The serialized form follows the same shape: a string is a shorthand, a
//! list is a union and a map is a spec.
//!
//! ```rust
//! use modelguard_schemas::Model;
//! use serde_json::json;
//!
//! let model: Model = serde_json::from_value(json!([
//!     {"type": "string", "maxLength": 4},
//!     {"type": "email"}
//! ])).unwrap();
//! assert!(matches!(model, Model::Union(ref branches) if branches.len() == 2));
//! ```
//!
//! Copyright (c) 2025 Modelguard Team
//! Licensed under the Apache-2.0 license

use crate::value::Value;
use indexmap::IndexMap;
use regex::Regex;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while building a model
#[derive(Debug, Error)]
pub enum ModelError {
    /// A union needs at least one alternative
    #[error("a union model must contain at least one alternative")]
    EmptyUnion,

    /// A `regEx` pattern failed to compile
    #[error("invalid regEx pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// A model: shorthand, full spec, or ordered union of models
#[derive(Debug, Clone)]
pub enum Model {
    TypeName(String),
    Spec(Box<Spec>),
    Union(Vec<Model>),
}

impl Model {
    /// Build a union, rejecting an empty list of alternatives
    pub fn union(models: Vec<Model>) -> Result<Self, ModelError> {
        if models.is_empty() {
            return Err(ModelError::EmptyUnion);
        }
        Ok(Model::Union(models))
    }

    /// The spec this model stands for, or `None` for a union.
    /// Shorthands expand to a spec carrying only the type.
    pub fn as_spec(&self) -> Option<Cow<'_, Spec>> {
        match self {
            Model::TypeName(name) => Some(Cow::Owned(Spec::new(name.as_str()))),
            Model::Spec(spec) => Some(Cow::Borrowed(spec)),
            Model::Union(_) => None,
        }
    }
}

impl From<&str> for Model {
    fn from(name: &str) -> Self {
        Model::TypeName(name.to_string())
    }
}

impl From<String> for Model {
    fn from(name: String) -> Self {
        Model::TypeName(name)
    }
}

impl From<Spec> for Model {
    fn from(spec: Spec) -> Self {
        Model::Spec(Box::new(spec))
    }
}

impl Serialize for Model {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Model::TypeName(name) => serializer.serialize_str(name),
            Model::Spec(spec) => spec.serialize(serializer),
            Model::Union(models) => models.serialize(serializer),
        }
    }
}

impl Model {
    /// Build a model from a parsed JSON document.
    ///
    /// A string is a shorthand, a list is a union and a map is a spec. Errors
    /// from nested models keep their own message.
    pub fn from_document(document: serde_json::Value) -> Result<Self, serde_json::Error> {
        match document {
            serde_json::Value::String(name) => Ok(Model::TypeName(name)),
            serde_json::Value::Array(items) => {
                let models = items
                    .into_iter()
                    .map(Model::from_document)
                    .collect::<Result<Vec<_>, _>>()?;
                Model::union(models).map_err(de::Error::custom)
            }
            serde_json::Value::Object(map) => {
                let spec: Spec = serde_json::from_value(serde_json::Value::Object(map))?;
                Ok(Model::Spec(Box::new(spec)))
            }
            other => Err(de::Error::custom(format!(
                "expected a type name, a list of models, or a spec map with a `type` field, found {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(document: &serde_json::Value) -> &'static str {
    match document {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a list",
        serde_json::Value::Object(_) => "a map",
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let document = serde_json::Value::deserialize(deserializer)?;
        Model::from_document(document).map_err(de::Error::custom)
    }
}

/// Recursive child models of an array or object spec
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Children {
    /// One model per array index; the array length must match
    Positional(Vec<Model>),
    /// One model per object key; only listed keys are checked
    Keyed(IndexMap<String, Model>),
}

impl<'de> Deserialize<'de> for Children {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(Model::from_document)
                .collect::<Result<Vec<_>, _>>()
                .map(Children::Positional)
                .map_err(de::Error::custom),
            serde_json::Value::Object(map) => map
                .into_iter()
                .map(|(key, document)| Model::from_document(document).map(|model| (key, model)))
                .collect::<Result<IndexMap<_, _>, _>>()
                .map(Children::Keyed)
                .map_err(de::Error::custom),
            other => Err(de::Error::custom(format!(
                "children must be a list or a map of models, found {}",
                json_kind(&other)
            ))),
        }
    }
}

type ExtendFn = dyn Fn(&Value) -> anyhow::Result<()> + Send + Sync;

/// Custom post-check run after the built-in rules pass
#[derive(Clone)]
pub struct Extension(Arc<ExtendFn>);

impl Extension {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Build an extension from a boolean predicate
    pub fn from_predicate<F>(predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::new(move |value| {
            if predicate(value) {
                Ok(())
            } else {
                anyhow::bail!("predicate rejected the value")
            }
        })
    }

    pub fn run(&self, value: &Value) -> anyhow::Result<()> {
        (self.0)(value)
    }
}

impl fmt::Debug for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Extension(..)")
    }
}

/// A full model record: a registered `type` plus constraints
///
/// Which constraint fields are honoured depends on the rule registered for
/// `type`. Fields no built-in rule knows about are kept in `extra` for
/// custom rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spec {
    /// Registered type name
    #[serde(rename = "type")]
    pub type_name: String,

    /// A missing value passes instead of failing
    #[serde(default, skip_serializing_if = "is_false")]
    pub not_required: bool,

    /// Falsy values that count as present
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accepted_nulls: Vec<Value>,

    /// Post-check hook; code only
    #[serde(skip)]
    pub extend: Option<Extension>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    /// Maximum number of fraction digits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<usize>,

    #[serde(default, with = "pattern", skip_serializing_if = "Option::is_none")]
    pub reg_ex: Option<Regex>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub includes: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_includes: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub includes_any: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_includes_any: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_keys: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_children: Option<Box<Model>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Children>,

    /// Fields for custom rules
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Spec {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    pub fn with_not_required(mut self) -> Self {
        self.not_required = true;
        self
    }

    pub fn with_accepted_nulls<I, V>(mut self, nulls: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.accepted_nulls = nulls.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_extend<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.extend = Some(Extension::new(f));
        self
    }

    pub fn with_extension(mut self, extension: Extension) -> Self {
        self.extend = Some(extension);
        self
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = Some(decimals);
        self
    }

    pub fn with_reg_ex(mut self, reg_ex: Regex) -> Self {
        self.reg_ex = Some(reg_ex);
        self
    }

    /// Compile and set a `regEx` pattern
    pub fn with_pattern(self, pattern: &str) -> Result<Self, ModelError> {
        Ok(self.with_reg_ex(Regex::new(pattern)?))
    }

    pub fn with_includes(mut self, needle: impl Into<Value>) -> Self {
        self.includes = Some(needle.into());
        self
    }

    pub fn with_not_includes(mut self, needle: impl Into<Value>) -> Self {
        self.not_includes = Some(needle.into());
        self
    }

    pub fn with_includes_any<I, V>(mut self, needles: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.includes_any = Some(needles.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_not_includes_any<I, V>(mut self, needles: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.not_includes_any = Some(needles.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_required_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.required_keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_all_children(mut self, model: impl Into<Model>) -> Self {
        self.all_children = Some(Box::new(model.into()));
        self
    }

    /// Positional children for an array spec
    pub fn with_children(mut self, models: Vec<Model>) -> Self {
        self.children = Some(Children::Positional(models));
        self
    }

    /// Keyed children for an object spec
    pub fn with_keyed_children<I, K>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Model)>,
        K: Into<String>,
    {
        self.children = Some(Children::Keyed(
            entries.into_iter().map(|(k, m)| (k.into(), m)).collect(),
        ));
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// `true` if `value` is whitelisted by `acceptedNulls`
    pub fn accepts_null(&self, value: &Value) -> bool {
        self.accepted_nulls.iter().any(|accepted| accepted == value)
    }
}

/// Serde adapter storing a compiled regex as its pattern string
mod pattern {
    use regex::Regex;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(reg_ex: &Option<Regex>, serializer: S) -> Result<S::Ok, S::Error> {
        match reg_ex {
            Some(reg_ex) => serializer.serialize_some(reg_ex.as_str()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Regex>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|pattern| Regex::new(&pattern).map_err(de::Error::custom))
            .transpose()
    }
}
