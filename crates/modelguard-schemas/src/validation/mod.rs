//! Recursive validation of values against models
//!
//! The [`Validator`] resolves shorthands, tries union branches in order,
//! applies the presence policy and dispatches to the rule registered for a
//! spec's `type`. Failures are fail-fast: the first violated rule wins. How a
//! failure reaches the caller depends on the [`FailureMode`]:
//!
//! - **Raise**: the error is returned
//! - **Bool**: `Some(true)` or `Some(false)`
//! - **Off**: nothing is checked
//! - **Warn**: the error goes to the warning sink
//!
//! Copyright (c) 2025 Modelguard Team
//! Licensed under the Apache-2.0 license

pub mod base;
pub mod containment;
pub mod error;
pub mod registry;
pub mod rules;

// Re-export commonly used types
pub use base::{FailureMode, Name, TracingSink, Validator, WarnSink};
pub use containment::{includes_any, ContainmentOptions};
pub use error::{ErrorKind, ValidationError, ValidationErrors, ValidationResult, Violation};
pub use registry::{Rule, RuleRegistry};

use crate::model::Model;
use crate::value::Value;
use tracing::debug;

/// Validation configuration for batch operations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchConfig {
    /// Whether to stop on first error or collect all errors
    pub fail_fast: bool,
    /// Maximum number of errors to collect (0 = unlimited)
    pub max_errors: usize,
}

impl BatchConfig {
    /// Enable fail-fast mode
    pub fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Set maximum number of errors to collect
    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }
}

/// Validate every value against one model, naming each by its index
pub fn validate_batch(
    validator: &Validator,
    values: &[Value],
    model: &Model,
    config: &BatchConfig,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    for (i, value) in values.iter().enumerate() {
        match validator.check(value, model, &Name::Index(i)) {
            Ok(()) => continue,
            Err(error) => {
                errors.add(error);

                if config.fail_fast {
                    break;
                }

                if config.max_errors > 0 && errors.len() >= config.max_errors {
                    break;
                }
            }
        }
    }

    debug!(checked = values.len(), failed = errors.len(), "batch validation finished");
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> Vec<Value> {
        vec![
            Value::from(1),
            Value::from("a"),
            Value::from(2),
            Value::from("b"),
            Value::from("c"),
        ]
    }

    #[test]
    fn test_batch_config_builders() {
        let config = BatchConfig::default();
        assert!(!config.fail_fast);
        assert_eq!(config.max_errors, 0);

        let config = BatchConfig::default().with_fail_fast().with_max_errors(5);
        assert!(config.fail_fast);
        assert_eq!(config.max_errors, 5);
    }

    #[test]
    fn test_batch_collects_all_failures() {
        let errors = validate_batch(&Validator::default(), &values(), &Model::from("number"), &BatchConfig::default())
            .unwrap_err();
        let names: Vec<_> = errors.errors.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["1", "3", "4"]);
    }

    #[test]
    fn test_batch_limits() {
        let validator = Validator::default();
        let model = Model::from("number");

        let errors = validate_batch(&validator, &values(), &model, &BatchConfig::default().with_fail_fast())
            .unwrap_err();
        assert_eq!(errors.len(), 1);

        let errors = validate_batch(&validator, &values(), &model, &BatchConfig::default().with_max_errors(2))
            .unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_batch_success() {
        let values = vec![Value::from(1), Value::from(2.5)];
        assert!(validate_batch(&Validator::default(), &values, &Model::from("number"), &BatchConfig::default()).is_ok());
    }
}
