//! Validation error types
//!
//! Copyright (c) 2025 Modelguard Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The kind of rule a value violated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Value is missing (null or falsy) and not exempted
    RequiredValue,
    /// Runtime type does not match the spec type
    TypeMismatch,
    /// Length, key count, numeric bound, or decimal places violated
    RangeViolation,
    /// `regEx` did not match
    PatternMismatch,
    /// `includes`/`notIncludes`/`includesAny`/`notIncludesAny` violated
    ContentViolation,
    /// A `requiredKeys` entry is absent
    MissingKey,
    /// Positional children count differs from the array length
    ArityMismatch,
    /// Children shape does not fit the container type
    StructuralMismatch,
    /// No rule is registered for the spec type
    UnknownType,
    /// No union alternative matched
    Aggregate,
    /// The `extend` hook rejected the value
    CustomExtension,
}

impl ErrorKind {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::RequiredValue => "required_value",
            ErrorKind::TypeMismatch => "type_mismatch",
            ErrorKind::RangeViolation => "range_violation",
            ErrorKind::PatternMismatch => "pattern_mismatch",
            ErrorKind::ContentViolation => "content_violation",
            ErrorKind::MissingKey => "missing_key",
            ErrorKind::ArityMismatch => "arity_mismatch",
            ErrorKind::StructuralMismatch => "structural_mismatch",
            ErrorKind::UnknownType => "unknown_type",
            ErrorKind::Aggregate => "aggregate",
            ErrorKind::CustomExtension => "custom_extension",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A validation violation with detailed context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// The constraint that was violated, e.g. `maxLength`
    pub rule: String,
    /// What was expected
    pub expected: String,
    /// What was actually found
    pub actual: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rule '{}' violated: expected {}, but found {}",
            self.rule, self.expected, self.actual
        )
    }
}

/// A single validation failure
///
/// `name` is the label of the value that failed: an object key, an array
/// index, or `value` at the top level. It is not a path; a failure deep in a
/// structure reports only the innermost key or index.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub struct ValidationError {
    /// What kind of rule failed
    pub kind: ErrorKind,
    /// Label of the offending value
    pub name: String,
    /// Human-readable error message
    pub message: String,
    /// Constraint details, when a specific constraint failed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
    /// Per-branch failures of a union
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<ValidationError>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        for violation in &self.violations {
            write!(f, "\n  - {}", violation)?;
        }
        for (i, alternative) in self.alternatives.iter().enumerate() {
            write!(f, "\n  {}. {}", i + 1, alternative.message)?;
        }

        Ok(())
    }
}

impl ValidationError {
    /// Create a new validation error
    pub fn new<N, M>(kind: ErrorKind, name: N, message: M) -> Self
    where
        N: Into<String>,
        M: Into<String>,
    {
        Self {
            kind,
            name: name.into(),
            message: message.into(),
            violations: Vec::new(),
            alternatives: Vec::new(),
        }
    }

    /// Attach a violation describing the failed constraint
    pub fn with_violation<R, E, A>(mut self, rule: R, expected: E, actual: A) -> Self
    where
        R: Into<String>,
        E: Into<String>,
        A: Into<String>,
    {
        self.violations.push(Violation {
            rule: rule.into(),
            expected: expected.into(),
            actual: actual.into(),
        });
        self
    }

    /// Attach the failures of each union branch
    pub fn with_alternatives(mut self, alternatives: Vec<ValidationError>) -> Self {
        self.alternatives = alternatives;
        self
    }

    /// Stable code of this error's kind
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Multiple validation errors that can occur during batch validation
#[derive(Debug, Error, Serialize, Deserialize)]
pub struct ValidationErrors {
    /// List of validation errors
    pub errors: Vec<ValidationError>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Multiple validation errors occurred:")?;
        for (i, error) in self.errors.iter().enumerate() {
            write!(f, "\n{}. [{}] {}", i + 1, error.name, error)?;
        }
        Ok(())
    }
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Convert to result - Ok if no errors, Err if any errors exist
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Default for ValidationErrors {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        let mut errors = Self::new();
        errors.add(error);
        errors
    }
}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }
}
