//! The recursive validator and its failure-mode handling
//!
//! Copyright (c) 2025 Modelguard Team
//! Licensed under the Apache-2.0 license

use crate::model::{Model, Spec};
use crate::validation::error::{ErrorKind, ValidationError, ValidationResult};
use crate::validation::registry::RuleRegistry;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, OnceLock};
use tracing::trace;

/// Process-wide validator used by the free functions
static GLOBAL: OnceLock<Validator> = OnceLock::new();

/// How a failed validation is reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    /// Return the error
    #[default]
    Raise,
    /// Return `Some(true)` or `Some(false)` instead of an error
    Bool,
    /// Skip validation entirely and return `None`
    Off,
    /// Report the error to the warning sink and return `None`.
    ///
    /// The default [`TracingSink`] emits a `tracing` warning, or prints to
    /// stderr when no global subscriber is installed.
    Warn,
}

impl FailureMode {
    /// Resolve the `bool`/`off`/`warn` option flags.
    ///
    /// When several flags are set, `off` wins over `bool`, which wins over `warn`.
    pub fn from_flags(bool_flag: bool, off: bool, warn: bool) -> Self {
        if off {
            FailureMode::Off
        } else if bool_flag {
            FailureMode::Bool
        } else if warn {
            FailureMode::Warn
        } else {
            FailureMode::Raise
        }
    }
}

/// Label of the value being checked: the root, an object key or an array index
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Name {
    #[default]
    Root,
    Key(String),
    Index(usize),
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Name::Root => f.write_str("value"),
            Name::Key(key) => f.write_str(key),
            Name::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for Name {
    fn from(key: &str) -> Self {
        Name::Key(key.to_string())
    }
}

impl From<String> for Name {
    fn from(key: String) -> Self {
        Name::Key(key)
    }
}

impl From<usize> for Name {
    fn from(index: usize) -> Self {
        Name::Index(index)
    }
}

/// Receives errors suppressed by [`FailureMode::Warn`]
pub trait WarnSink: Send + Sync {
    fn warn(&self, error: &ValidationError);
}

/// Default sink: emits a `tracing` warning event.
///
/// Without a global subscriber the event would be dropped, so the warning is
/// written to stderr instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl WarnSink for TracingSink {
    fn warn(&self, error: &ValidationError) {
        if tracing::dispatcher::has_been_set() {
            tracing::warn!(kind = %error.kind, name = %error.name, "{}", error);
        } else {
            // Nowhere left to report a failed stderr write
            let _ = write_warning(&mut io::stderr().lock(), error);
        }
    }
}

fn write_warning(out: &mut impl Write, error: &ValidationError) -> io::Result<()> {
    writeln!(out, "warning: [{}] {}", error.code(), error)
}

/// Recursive validator over a frozen rule registry
#[derive(Clone)]
pub struct Validator {
    registry: Arc<RuleRegistry>,
    sink: Arc<dyn WarnSink>,
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(RuleRegistry::builtin())
    }
}

impl Validator {
    /// Freeze a registry into a validator reporting warnings through `tracing`
    pub fn new(registry: RuleRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            sink: Arc::new(TracingSink),
        }
    }

    /// Replace the warning sink
    pub fn with_sink<S: WarnSink + 'static>(mut self, sink: S) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    /// Share an existing sink
    pub fn with_shared_sink(mut self, sink: Arc<dyn WarnSink>) -> Self {
        self.sink = sink;
        self
    }

    /// The process-wide validator, built from [`RuleRegistry::builtin`]
    /// unless another one was installed first
    pub fn global() -> &'static Validator {
        GLOBAL.get_or_init(Validator::default)
    }

    /// Install the process-wide validator. Fails, handing the validator back,
    /// if one is already in place.
    pub fn install_global(validator: Validator) -> Result<(), Validator> {
        GLOBAL.set(validator)
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Validate `value` against `model`, applying `mode` to the outcome.
    ///
    /// Returns `Ok(Some(true))` on success under [`FailureMode::Bool`],
    /// `Ok(Some(false))` on failure under `Bool`, `Ok(None)` when there is
    /// nothing to report, and `Err` on failure under [`FailureMode::Raise`].
    pub fn validate(&self, value: &Value, model: &Model, mode: FailureMode) -> ValidationResult<Option<bool>> {
        self.validate_named(value, model, mode, &Name::Root)
    }

    /// [`Validator::validate`] with an explicit label for messages
    pub fn validate_named(
        &self,
        value: &Value,
        model: &Model,
        mode: FailureMode,
        name: &Name,
    ) -> ValidationResult<Option<bool>> {
        if mode == FailureMode::Off {
            return Ok(None);
        }

        match self.check(value, model, name) {
            Ok(()) => Ok((mode == FailureMode::Bool).then_some(true)),
            Err(error) => match mode {
                FailureMode::Bool => Ok(Some(false)),
                FailureMode::Warn => {
                    self.sink.warn(&error);
                    Ok(None)
                }
                _ => Err(error),
            },
        }
    }

    /// `true` if `value` satisfies `model`
    pub fn is_valid(&self, value: &Value, model: &Model) -> bool {
        self.check(value, model, &Name::Root).is_ok()
    }

    /// Check `value` against `model`, failing with the first violation.
    ///
    /// This is the entry point rule bodies use to recurse into children.
    pub fn check(&self, value: &Value, model: &Model, name: &Name) -> ValidationResult<()> {
        match model {
            Model::Union(branches) => self.check_union(value, branches, name),
            Model::TypeName(type_name) => self.check_spec(value, &Spec::new(type_name.as_str()), name),
            Model::Spec(spec) => self.check_spec(value, spec, name),
        }
    }

    /// Check `value` against a single spec: presence, type rule, then `extend`
    pub fn check_spec(&self, value: &Value, spec: &Spec, name: &Name) -> ValidationResult<()> {
        if value.is_falsy() && !spec.accepts_null(value) {
            if spec.not_required {
                return Ok(());
            }
            return Err(ValidationError::new(
                ErrorKind::RequiredValue,
                name.to_string(),
                format!("{} is required", name),
            )
            .with_violation("required", "a value", value.to_text()));
        }

        let rule = self.registry.get(&spec.type_name).ok_or_else(|| {
            ValidationError::new(
                ErrorKind::UnknownType,
                name.to_string(),
                format!("Unknown type '{}' for {}", spec.type_name, name),
            )
            .with_violation("type", "a registered type", spec.type_name.clone())
        })?;

        trace!(type_name = %spec.type_name, name = %name, "checking value");
        rule.check(value, spec, name, self)?;

        if let Some(extension) = &spec.extend {
            extension.run(value).map_err(|e| {
                ValidationError::new(
                    ErrorKind::CustomExtension,
                    name.to_string(),
                    format!("{} failed custom validation: {}", name, e),
                )
            })?;
        }

        Ok(())
    }

    fn check_union(&self, value: &Value, branches: &[Model], name: &Name) -> ValidationResult<()> {
        let mut failures = Vec::with_capacity(branches.len());

        for branch in branches {
            match self.check(value, branch, name) {
                Ok(()) => return Ok(()),
                Err(error) => failures.push(error),
            }
        }

        Err(ValidationError::new(
            ErrorKind::Aggregate,
            name.to_string(),
            format!(
                "{} did not match any of {} alternative(s)",
                name,
                branches.len()
            ),
        )
        .with_alternatives(failures))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CollectingSink {
        seen: Mutex<Vec<String>>,
    }

    impl WarnSink for CollectingSink {
        fn warn(&self, error: &ValidationError) {
            self.seen.lock().unwrap().push(error.code().to_string());
        }
    }

    #[test]
    fn test_failure_mode_precedence() {
        assert_eq!(FailureMode::from_flags(false, false, false), FailureMode::Raise);
        assert_eq!(FailureMode::from_flags(true, false, false), FailureMode::Bool);
        assert_eq!(FailureMode::from_flags(false, false, true), FailureMode::Warn);
        assert_eq!(FailureMode::from_flags(true, true, true), FailureMode::Off);
        assert_eq!(FailureMode::from_flags(true, false, true), FailureMode::Bool);
    }

    #[test]
    fn test_stderr_warning_line() {
        let error = ValidationError::new(ErrorKind::TypeMismatch, "age", "Expected age to be type number. Got string");
        let mut out = Vec::new();
        write_warning(&mut out, &error).unwrap();

        let line = String::from_utf8(out).unwrap();
        assert!(line.starts_with("warning: [type_mismatch] "), "{}", line);
        assert!(line.contains("Expected age to be type number"));
        assert!(line.ends_with('\n'));
    }

    #[test]
    fn test_tracing_sink_without_subscriber() {
        assert!(!tracing::dispatcher::has_been_set());
        let error = ValidationError::new(ErrorKind::RequiredValue, "value", "value is required");
        TracingSink.warn(&error);
    }

    #[test]
    fn test_name_display() {
        assert_eq!(Name::Root.to_string(), "value");
        assert_eq!(Name::from("email").to_string(), "email");
        assert_eq!(Name::from(3).to_string(), "3");
    }

    #[test]
    fn test_warn_mode_reports_to_sink() {
        let sink = Arc::new(CollectingSink::default());
        let validator = Validator::default().with_shared_sink(sink.clone());
        let value = Value::from(33);

        let outcome = validator.validate(&value, &Model::from("string"), FailureMode::Warn);
        assert!(matches!(outcome, Ok(None)));
        assert_eq!(*sink.seen.lock().unwrap(), vec!["type_mismatch".to_string()]);

        let outcome = validator.validate(&Value::from("ok"), &Model::from("string"), FailureMode::Warn);
        assert!(matches!(outcome, Ok(None)));
        assert_eq!(sink.seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_union_failures_do_not_reach_sink() {
        let sink = Arc::new(CollectingSink::default());
        let validator = Validator::default().with_shared_sink(sink.clone());
        let model: Model = serde_json::from_value(json!(["number", "boolean", "string"])).unwrap();

        let outcome = validator.validate(&Value::from("text"), &model, FailureMode::Warn);
        assert!(matches!(outcome, Ok(None)));
        assert!(sink.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_off_mode_skips_unknown_types() {
        let validator = Validator::default();
        let outcome = validator.validate(&Value::from(1), &Model::from("no-such-type"), FailureMode::Off);
        assert!(matches!(outcome, Ok(None)));
    }

    #[test]
    fn test_presence_runs_before_type_lookup() {
        let validator = Validator::default();
        let model = Model::from(Spec::new("no-such-type").with_not_required());
        assert!(validator.is_valid(&Value::from(false), &model));

        let error = validator.check(&Value::from(true), &model, &Name::Root).unwrap_err();
        assert_eq!(error.kind, ErrorKind::UnknownType);
    }
}
