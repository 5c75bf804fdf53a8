//! Registry mapping type names to rule bodies
//!
//! A [`RuleRegistry`] is built up front (usually from
//! [`RuleRegistry::builtin`] plus custom registrations) and then frozen into a
//! [`Validator`]. Lookups never mutate it.
//!
//! ```rust
//! use modelguard_schemas::{ErrorKind, Model, Name, RuleRegistry, Spec, ValidationError, Validator, Value};
//!
//! let mut registry = RuleRegistry::builtin();
//! registry.register_fn("even", |value: &Value, _spec: &Spec, name: &Name, _v: &Validator| {
//!     match value.as_f64() {
//!         Some(n) if n % 2.0 == 0.0 => Ok(()),
//!         _ => Err(ValidationError::new(ErrorKind::TypeMismatch, name.to_string(), "not even")),
//!     }
//! });
//!
//! let validator = Validator::new(registry);
//! assert!(validator.is_valid(&Value::from(4), &Model::from("even")));
//! assert!(!validator.is_valid(&Value::from(3), &Model::from("even")));
//! ```
//!
//! Copyright (c) 2025 Modelguard Team
//! Licensed under the Apache-2.0 license

use crate::model::Spec;
use crate::validation::base::{Name, Validator};
use crate::validation::error::ValidationResult;
use crate::validation::rules;
use crate::value::Value;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A rule body for one type
///
/// Implementations perform the base type check and the constraint checks the
/// type supports, recursing into children through [`Validator::check`].
pub trait Rule: Send + Sync {
    fn check(&self, value: &Value, spec: &Spec, name: &Name, validator: &Validator) -> ValidationResult<()>;
}

/// Adapter turning a closure into a [`Rule`]
struct FnRule<F>(F);

impl<F> Rule for FnRule<F>
where
    F: Fn(&Value, &Spec, &Name, &Validator) -> ValidationResult<()> + Send + Sync,
{
    fn check(&self, value: &Value, spec: &Spec, name: &Name, validator: &Validator) -> ValidationResult<()> {
        (self.0)(value, spec, name, validator)
    }
}

/// Ordered mapping from type name to rule body
#[derive(Clone, Default)]
pub struct RuleRegistry {
    rules: IndexMap<String, Arc<dyn Rule>>,
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rules.keys()).finish()
    }
}

impl RuleRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in types: `array`, `function`, `object`,
    /// `string`, `number`, `boolean` and `email`
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        rules::register_builtin(&mut registry);
        registry
    }

    /// Register a rule body. Registering an existing name replaces its body
    /// and keeps its position.
    pub fn register<R>(&mut self, type_name: impl Into<String>, rule: R) -> &mut Self
    where
        R: Rule + 'static,
    {
        let type_name = type_name.into();
        debug!(type_name = %type_name, "registering rule");
        self.rules.insert(type_name, Arc::new(rule));
        self
    }

    /// Register a closure as a rule body
    pub fn register_fn<F>(&mut self, type_name: impl Into<String>, rule: F) -> &mut Self
    where
        F: Fn(&Value, &Spec, &Name, &Validator) -> ValidationResult<()> + Send + Sync + 'static,
    {
        self.register(type_name, FnRule(rule))
    }

    /// Builder form of [`RuleRegistry::register`]
    pub fn with_rule<R>(mut self, type_name: impl Into<String>, rule: R) -> Self
    where
        R: Rule + 'static,
    {
        self.register(type_name, rule);
        self
    }

    pub fn get(&self, type_name: &str) -> Option<&dyn Rule> {
        self.rules.get(type_name).map(|rule| rule.as_ref())
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.rules.contains_key(type_name)
    }

    /// Registered type names in registration order
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
