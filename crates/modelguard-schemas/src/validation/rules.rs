//! Built-in rule bodies
//!
//! Each rule performs its base type check first and then the constraint
//! checks in a fixed order, stopping at the first violation.
//!
//! Copyright (c) 2025 Modelguard Team
//! Licensed under the Apache-2.0 license

use crate::model::{Children, Model, Spec};
use crate::validation::base::{Name, Validator};
use crate::validation::containment::{self, ContainmentOptions};
use crate::validation::error::{ErrorKind, ValidationError, ValidationResult};
use crate::validation::registry::{Rule, RuleRegistry};
use crate::value::{number_text, Value};
use regex::Regex;
use std::sync::OnceLock;

/// Stand-in for object keys a keyed child model names but the value lacks
static MISSING: Value = Value::Null;

/// Pattern every `email` value must match
const EMAIL_PATTERN: &str = r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#;

const EMAIL_MAX_LENGTH: usize = 50;

/// Register the built-in types in their enumeration order
pub(crate) fn register_builtin(registry: &mut RuleRegistry) {
    registry
        .register("array", ArrayRule)
        .register("function", FunctionRule)
        .register("object", ObjectRule)
        .register("string", StringRule)
        .register("number", NumberRule)
        .register("boolean", BooleanRule)
        .register("email", EmailRule);
}

fn type_mismatch(expected: &str, value: &Value, name: &Name) -> ValidationError {
    ValidationError::new(
        ErrorKind::TypeMismatch,
        name.to_string(),
        format!("Expected {} to be type {}. Got {}", name, expected, value.type_name()),
    )
    .with_violation("type", expected, value.type_name())
}

/// `minLength`/`maxLength` against a length already measured by the caller
fn check_length(label: &str, len: usize, spec: &Spec, name: &Name) -> ValidationResult<()> {
    if let Some(min) = spec.min_length {
        if len < min {
            return Err(ValidationError::new(
                ErrorKind::RangeViolation,
                name.to_string(),
                format!("{} length is less than minimum", label),
            )
            .with_violation("minLength", format!("at least {}", min), len.to_string()));
        }
    }
    if let Some(max) = spec.max_length {
        if len > max {
            return Err(ValidationError::new(
                ErrorKind::RangeViolation,
                name.to_string(),
                format!("{} length is more than maximum", label),
            )
            .with_violation("maxLength", format!("at most {}", max), len.to_string()));
        }
    }
    Ok(())
}

fn list_text(values: &[Value]) -> String {
    values.iter().map(Value::to_text).collect::<Vec<_>>().join(",")
}

fn content_violation(name: &Name, message: String, rule: &str, expected: String) -> ValidationError {
    ValidationError::new(ErrorKind::ContentViolation, name.to_string(), message)
        .with_violation(rule, expected, "a mismatching value")
}

/// `includes`, `notIncludes`, `includesAny` and `notIncludesAny` on an array
/// or object, compared through compact JSON text
fn check_structural_content(label: &str, value: &Value, spec: &Spec, name: &Name) -> ValidationResult<()> {
    check_structural_includes(label, value, spec, name)?;
    check_structural_includes_any(label, value, spec, name)
}

fn check_structural_includes(label: &str, value: &Value, spec: &Spec, name: &Name) -> ValidationResult<()> {
    let options = ContainmentOptions::stringified();

    if let Some(needle) = &spec.includes {
        if !containment::includes(value, needle, options) {
            return Err(content_violation(
                name,
                format!("{} {} does not include required string: {}", label, name, needle.to_text()),
                "includes",
                needle.stringify(),
            ));
        }
    }
    if let Some(needle) = &spec.not_includes {
        if containment::includes(value, needle, options) {
            return Err(content_violation(
                name,
                format!("{} {} includes blacklisted string: {}", label, name, needle.to_text()),
                "notIncludes",
                format!("no {}", needle.stringify()),
            ));
        }
    }
    Ok(())
}

fn check_structural_includes_any(label: &str, value: &Value, spec: &Spec, name: &Name) -> ValidationResult<()> {
    let options = ContainmentOptions::stringified();

    if let Some(needles) = &spec.includes_any {
        if !containment::includes_any(value, needles, options) {
            return Err(content_violation(
                name,
                format!("{} {} does not include required string from: {}", label, name, list_text(needles)),
                "includesAny",
                format!("one of [{}]", list_text(needles)),
            ));
        }
    }
    if let Some(needles) = &spec.not_includes_any {
        if containment::includes_any(value, needles, options) {
            return Err(content_violation(
                name,
                format!("{} {} includes blacklisted string from: {}", label, name, list_text(needles)),
                "notIncludesAny",
                format!("none of [{}]", list_text(needles)),
            ));
        }
    }
    Ok(())
}

/// `type: array`
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayRule;

impl Rule for ArrayRule {
    fn check(&self, value: &Value, spec: &Spec, name: &Name, validator: &Validator) -> ValidationResult<()> {
        let items = value.as_array().ok_or_else(|| type_mismatch("array", value, name))?;

        check_length("Array", items.len(), spec, name)?;
        check_structural_content("Array", value, spec, name)?;

        if let Some(model) = &spec.all_children {
            for (i, item) in items.iter().enumerate() {
                validator.check(item, model, &Name::Index(i))?;
            }
        }

        match &spec.children {
            None => Ok(()),
            Some(Children::Keyed(_)) => Err(ValidationError::new(
                ErrorKind::StructuralMismatch,
                name.to_string(),
                format!("{}.children must be an array.", name),
            )
            .with_violation("children", "a list of models", "a map of models")),
            Some(Children::Positional(models)) => {
                if models.len() != items.len() {
                    return Err(ValidationError::new(
                        ErrorKind::ArityMismatch,
                        name.to_string(),
                        format!("validation and array for {} are out of sync.", name),
                    )
                    .with_violation("children", format!("{} item(s)", models.len()), items.len().to_string()));
                }
                for (i, (item, model)) in items.iter().zip(models).enumerate() {
                    validator.check(item, model, &Name::Index(i))?;
                }
                Ok(())
            }
        }
    }
}

/// `type: function`
#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionRule;

impl Rule for FunctionRule {
    fn check(&self, value: &Value, _spec: &Spec, name: &Name, _validator: &Validator) -> ValidationResult<()> {
        if value.is_function() {
            Ok(())
        } else {
            Err(type_mismatch("function", value, name))
        }
    }
}

/// `type: object`
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectRule;

impl Rule for ObjectRule {
    fn check(&self, value: &Value, spec: &Spec, name: &Name, validator: &Validator) -> ValidationResult<()> {
        let map = value.as_object().ok_or_else(|| type_mismatch("object", value, name))?;

        if let Some(required_keys) = &spec.required_keys {
            if let Some(key) = required_keys.iter().find(|key| !map.contains_key(key.as_str())) {
                return Err(ValidationError::new(
                    ErrorKind::MissingKey,
                    name.to_string(),
                    format!("Missing required key: {}", key),
                )
                .with_violation("requiredKeys", key.clone(), "absent"));
            }
        }

        check_structural_includes("Object", value, spec, name)?;
        check_length("Object", map.len(), spec, name)?;
        check_structural_includes_any("Object", value, spec, name)?;

        if let Some(model) = &spec.all_children {
            for (key, child) in map {
                validator.check(child, model, &Name::Key(key.clone()))?;
            }
        }

        match &spec.children {
            None => Ok(()),
            Some(Children::Positional(_)) => Err(ValidationError::new(
                ErrorKind::StructuralMismatch,
                name.to_string(),
                format!("Expected {} validation children to be type object. Got array", name),
            )
            .with_violation("children", "a map of models", "a list of models")),
            Some(Children::Keyed(models)) => {
                for (key, model) in models {
                    let child = map.get(key).unwrap_or(&MISSING);
                    validator.check(child, model, &Name::Key(key.clone()))?;
                }
                Ok(())
            }
        }
    }
}

/// `type: string`
#[derive(Debug, Clone, Copy, Default)]
pub struct StringRule;

impl StringRule {
    /// Content messages quote the name, or the value itself at the top level
    fn subject(text: &str, name: &Name) -> String {
        match name {
            Name::Root => text.to_string(),
            other => other.to_string(),
        }
    }
}

impl Rule for StringRule {
    fn check(&self, value: &Value, spec: &Spec, name: &Name, _validator: &Validator) -> ValidationResult<()> {
        let text = value.as_str().ok_or_else(|| type_mismatch("string", value, name))?;

        check_length("String", text.chars().count(), spec, name)?;

        if let Some(reg_ex) = &spec.reg_ex {
            if !reg_ex.is_match(text) {
                return Err(ValidationError::new(
                    ErrorKind::PatternMismatch,
                    name.to_string(),
                    "String does not match the validation regEx.",
                )
                .with_violation("regEx", reg_ex.as_str(), text));
            }
        }

        let options = ContainmentOptions::default();
        let subject = Self::subject(text, name);

        if let Some(needle) = &spec.includes {
            if !containment::includes(value, needle, options) {
                return Err(content_violation(
                    name,
                    format!("String \"{}\" does not include required string: {}", subject, needle.to_text()),
                    "includes",
                    needle.to_text(),
                ));
            }
        }
        if let Some(needle) = &spec.not_includes {
            if containment::includes(value, needle, options) {
                return Err(content_violation(
                    name,
                    format!("String \"{}\" includes blacklisted string: {}", subject, needle.to_text()),
                    "notIncludes",
                    format!("no {}", needle.to_text()),
                ));
            }
        }
        if let Some(needles) = &spec.includes_any {
            if !containment::includes_any(value, needles, options) {
                return Err(content_violation(
                    name,
                    format!("String \"{}\" does not include required string: [{}]", subject, list_text(needles)),
                    "includesAny",
                    format!("one of [{}]", list_text(needles)),
                ));
            }
        }
        if let Some(needles) = &spec.not_includes_any {
            if containment::includes_any(value, needles, options) {
                return Err(content_violation(
                    name,
                    format!("String \"{}\" includes a blacklisted string: [{}]", subject, list_text(needles)),
                    "notIncludesAny",
                    format!("none of [{}]", list_text(needles)),
                ));
            }
        }

        Ok(())
    }
}

/// `type: number`
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberRule;

impl Rule for NumberRule {
    fn check(&self, value: &Value, spec: &Spec, name: &Name, _validator: &Validator) -> ValidationResult<()> {
        let Value::Number(number) = value else {
            return Err(type_mismatch("number", value, name));
        };
        let n = number.as_f64().ok_or_else(|| type_mismatch("number", value, name))?;
        let text = number_text(number);

        if let Some(min) = spec.min {
            if n < min {
                return Err(ValidationError::new(
                    ErrorKind::RangeViolation,
                    name.to_string(),
                    "Number is less than minimum",
                )
                .with_violation("min", format!("at least {}", min), text));
            }
        }
        if let Some(max) = spec.max {
            if n > max {
                return Err(ValidationError::new(
                    ErrorKind::RangeViolation,
                    name.to_string(),
                    "Number is more than maximum",
                )
                .with_violation("max", format!("at most {}", max), text));
            }
        }
        if let Some(decimals) = spec.decimals {
            let places = text.split_once('.').map_or(0, |(_, fraction)| fraction.len());
            if places > decimals {
                return Err(ValidationError::new(
                    ErrorKind::RangeViolation,
                    name.to_string(),
                    format!("Number: {} has more than {} decimals.", text, decimals),
                )
                .with_violation("decimals", format!("at most {}", decimals), places.to_string()));
            }
        }
        if let Some(reg_ex) = &spec.reg_ex {
            if !reg_ex.is_match(&text) {
                return Err(ValidationError::new(
                    ErrorKind::PatternMismatch,
                    name.to_string(),
                    "Number does not match the validation regEx.",
                )
                .with_violation("regEx", reg_ex.as_str(), text));
            }
        }

        Ok(())
    }
}

/// `type: boolean`
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanRule;

impl Rule for BooleanRule {
    fn check(&self, value: &Value, _spec: &Spec, name: &Name, _validator: &Validator) -> ValidationResult<()> {
        match value {
            Value::Bool(_) => Ok(()),
            other => Err(type_mismatch("boolean", other, name)),
        }
    }
}

/// `type: email`: a string of at most 50 characters shaped like an address
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailRule;

impl EmailRule {
    fn model() -> &'static Model {
        static MODEL: OnceLock<Model> = OnceLock::new();
        MODEL.get_or_init(|| {
            let reg_ex = Regex::new(EMAIL_PATTERN).expect("email pattern is valid");
            Model::from(
                Spec::new("string")
                    .with_max_length(EMAIL_MAX_LENGTH)
                    .with_reg_ex(reg_ex),
            )
        })
    }
}

impl Rule for EmailRule {
    fn check(&self, value: &Value, _spec: &Spec, name: &Name, validator: &Validator) -> ValidationResult<()> {
        validator.check(value, Self::model(), name)
    }
}
