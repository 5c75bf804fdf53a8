//! Modelguard Schemas - runtime validation of values against declarative models
//!
//! A *model* describes what a value must look like: a type shorthand such as
//! `"string"`, a full spec with constraints, or a union of models. The
//! [`Validator`] checks values against models recursively and reports the
//! first violation, and [`ValidatedFn`] applies models to the arguments and
//! return value of a function call.
//!
//! ## Features
//!
//! - **Built-in types**: `array`, `function`, `object`, `string`, `number`,
//!   `boolean` and `email`
//! - **Extensible registry**: register custom types as closures or [`Rule`]
//!   implementations before building a validator
//! - **Failure modes**: raise, return a boolean, skip, or warn
//! - **Function contracts**: input and output models around a call
//! - **Batch validation**: many values against one model, with limits
//! - **File loading**: values and models from YAML or JSON
//!
//! ## Quick Start
//!
//! ```rust
//! use modelguard_schemas::{validate, FailureMode, Model, Value};
//! use serde_json::json;
//!
//! let model: Model = serde_json::from_value(json!({
//!     "type": "object",
//!     "requiredKeys": ["name"],
//!     "children": {
//!         "name": {"type": "string", "maxLength": 20},
//!         "age": {"type": "number", "min": 0, "notRequired": true}
//!     }
//! }))
//! .unwrap();
//!
//! let value = Value::from(json!({"name": "Ada", "age": 36}));
//! assert!(validate(&value, &model, FailureMode::Raise).is_ok());
//!
//! let value = Value::from(json!({"age": 36}));
//! assert_eq!(validate(&value, &model, FailureMode::Bool).unwrap(), Some(false));
//! ```
//!
//! Copyright (c) 2025 Modelguard Team
//! Licensed under the Apache-2.0 license

pub mod function;
pub mod loader;
pub mod model;
pub mod validation;
pub mod value;

// Re-export commonly used types for convenience
pub use function::{CallArgs, FuncError, InputModel, ValidatedFn};
pub use loader::{load_model, load_value, LoaderError, LoaderResult};
pub use model::{Children, Extension, Model, ModelError, Spec};
pub use validation::{
    includes_any, validate_batch, BatchConfig, ContainmentOptions, ErrorKind, FailureMode, Name, Rule,
    RuleRegistry, TracingSink, ValidationError, ValidationErrors, ValidationResult, Validator, Violation,
    WarnSink,
};
pub use value::{Callable, Map, Value};

/// Validate `value` against `model` with the process-wide validator
///
/// See [`Validator::validate`] for how `mode` shapes the result.
pub fn validate(value: &Value, model: &Model, mode: FailureMode) -> ValidationResult<Option<bool>> {
    Validator::global().validate(value, model, mode)
}

/// Call `func` with `args`, checking its declared input and output models
/// with the process-wide validator
pub fn validate_func(func: &ValidatedFn, args: impl Into<CallArgs>) -> Result<Value, FuncError> {
    func.call(args)
}
