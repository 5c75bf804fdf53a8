//! Validation of arguments and return values around a function call
//!
//! A [`ValidatedFn`] pairs a [`Callable`] with an optional input model and an
//! optional output model. Calling it validates the arguments, invokes the
//! callable, validates the result and hands the result back unchanged.
//!
//! ```rust
//! use modelguard_schemas::{CallArgs, InputModel, Model, ValidatedFn, Value};
//!
//! let multiply = ValidatedFn::from_fn(|args| {
//!     let a = args[0].as_f64().unwrap_or_default();
//!     let b = args[1].as_f64().unwrap_or_default();
//!     Ok(Value::from(a * b))
//! })
//! .with_input_model(InputModel::Positional(vec![Model::from("number"), Model::from("number")]))
//! .with_output_model("number");
//!
//! let product = multiply.call(vec![Value::from(2), Value::from(3)]).unwrap();
//! assert_eq!(product, Value::from(6));
//! assert!(multiply.call(vec![Value::from(2), Value::from("a")]).is_err());
//! ```
//!
//! Copyright (c) 2025 Modelguard Team
//! Licensed under the Apache-2.0 license

use crate::model::{Model, Spec};
use crate::validation::{ErrorKind, Name, ValidationError, Validator};
use crate::value::{Callable, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors raised by [`ValidatedFn::call`]
#[derive(Debug, Error)]
pub enum FuncError {
    /// The arguments did not satisfy the input model; the callable never ran
    #[error("invalid input: {0}")]
    Input(#[source] ValidationError),

    /// The return value did not satisfy the output model
    #[error("invalid output: {0}")]
    Output(#[source] ValidationError),

    /// The callable itself failed
    #[error(transparent)]
    Call(#[from] anyhow::Error),
}

impl FuncError {
    /// The validation failure behind an input or output error
    pub fn validation_error(&self) -> Option<&ValidationError> {
        match self {
            FuncError::Input(error) | FuncError::Output(error) => Some(error),
            FuncError::Call(_) => None,
        }
    }
}

/// Declared shape of a function's parameters
///
/// Serialized, a list is positional, a type name or a map with a `type` field
/// is a single model and any other map is keyed.
///
/// A parameter named `type` therefore cannot be declared from a document:
/// `{"type": "number", "count": "number"}` loads as one number spec with an
/// unknown `count` field. Build such models with [`InputModel::keyed`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputModel {
    /// One model per parameter; the argument count must match
    Positional(Vec<Model>),
    /// One model for a single parameter
    Single(Model),
    /// Parameter name to model, checked against one object argument
    Keyed(IndexMap<String, Model>),
}

impl InputModel {
    /// Build a keyed input model
    pub fn keyed<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Model)>,
        K: Into<String>,
    {
        InputModel::Keyed(entries.into_iter().map(|(k, m)| (k.into(), m)).collect())
    }
}

impl From<Model> for InputModel {
    fn from(model: Model) -> Self {
        InputModel::Single(model)
    }
}

impl From<Vec<Model>> for InputModel {
    fn from(models: Vec<Model>) -> Self {
        InputModel::Positional(models)
    }
}

/// Arguments for one call
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CallArgs {
    /// No arguments
    #[default]
    None,
    /// Exactly one argument, passed as is
    Single(Value),
    /// Positional arguments
    Positional(Vec<Value>),
}

impl CallArgs {
    fn as_slice(&self) -> &[Value] {
        match self {
            CallArgs::None => &[],
            CallArgs::Single(value) => std::slice::from_ref(value),
            CallArgs::Positional(values) => values,
        }
    }
}

/// An array value spreads into positional arguments; anything else is a
/// single argument
impl From<Value> for CallArgs {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(values) => CallArgs::Positional(values),
            other => CallArgs::Single(other),
        }
    }
}

impl From<Vec<Value>> for CallArgs {
    fn from(values: Vec<Value>) -> Self {
        CallArgs::Positional(values)
    }
}

impl From<()> for CallArgs {
    fn from(_: ()) -> Self {
        CallArgs::None
    }
}

/// A callable with declared input and output models
#[derive(Clone)]
pub struct ValidatedFn {
    callable: Callable,
    input_model: Option<InputModel>,
    output_model: Option<Model>,
}

impl fmt::Debug for ValidatedFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedFn")
            .field("input_model", &self.input_model)
            .field("output_model", &self.output_model)
            .finish_non_exhaustive()
    }
}

impl ValidatedFn {
    pub fn new(callable: Callable) -> Self {
        Self {
            callable,
            input_model: None,
            output_model: None,
        }
    }

    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self::new(Callable::new(f))
    }

    pub fn with_input_model(mut self, model: impl Into<InputModel>) -> Self {
        self.input_model = Some(model.into());
        self
    }

    pub fn with_output_model(mut self, model: impl Into<Model>) -> Self {
        self.output_model = Some(model.into());
        self
    }

    pub fn input_model(&self) -> Option<&InputModel> {
        self.input_model.as_ref()
    }

    pub fn output_model(&self) -> Option<&Model> {
        self.output_model.as_ref()
    }

    /// Call through the process-wide validator
    pub fn call(&self, args: impl Into<CallArgs>) -> Result<Value, FuncError> {
        self.call_with(Validator::global(), args)
    }

    /// Validate `args`, invoke the callable and validate its result
    #[instrument(level = "debug", skip_all)]
    pub fn call_with(&self, validator: &Validator, args: impl Into<CallArgs>) -> Result<Value, FuncError> {
        let args = args.into();

        if let Some(input_model) = &self.input_model {
            check_input(validator, input_model, &args).map_err(FuncError::Input)?;
        }

        let output = self.callable.call(args.as_slice())?;

        if let Some(output_model) = &self.output_model {
            validator
                .check(&output, output_model, &Name::Root)
                .map_err(FuncError::Output)?;
        }

        debug!(output_type = output.type_name(), "validated call returned");
        Ok(output)
    }

    /// Turn this wrapper into a plain callable that validates on every call
    pub fn into_callable(self) -> Callable {
        Callable::new(move |args| Ok(self.call(args.to_vec())?))
    }
}

fn check_input(validator: &Validator, input_model: &InputModel, args: &CallArgs) -> Result<(), ValidationError> {
    match input_model {
        InputModel::Positional(models) => {
            let spec = Spec::new("array").with_children(models.clone());
            validator.check(&Value::Array(args.as_slice().to_vec()), &Model::from(spec), &Name::Root)
        }
        InputModel::Single(model) => validator.check(single_argument(args)?, model, &Name::Root),
        InputModel::Keyed(models) => {
            let spec = Spec::new("object").with_keyed_children(models.iter().map(|(k, m)| (k.clone(), m.clone())));
            validator.check(single_argument(args)?, &Model::from(spec), &Name::Root)
        }
    }
}

/// The one argument a single or keyed input model is checked against.
/// No arguments count as a missing (null) argument.
fn single_argument(args: &CallArgs) -> Result<&Value, ValidationError> {
    static NO_ARGUMENT: Value = Value::Null;

    match args {
        CallArgs::None => Ok(&NO_ARGUMENT),
        CallArgs::Single(value) => Ok(value),
        CallArgs::Positional(values) if values.len() == 1 => Ok(&values[0]),
        CallArgs::Positional(values) => Err(ValidationError::new(
            ErrorKind::ArityMismatch,
            Name::Root.to_string(),
            format!("Expected a single argument. Got {}", values.len()),
        )
        .with_violation("arguments", "1", values.len().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn increment() -> ValidatedFn {
        ValidatedFn::from_fn(|args| {
            let n = args.first().and_then(Value::as_f64).unwrap_or_default();
            Ok(Value::from(n + 1.0))
        })
        .with_input_model(Model::from("number"))
    }

    #[test]
    fn test_single_argument_shapes() {
        let f = increment();
        assert_eq!(f.call(Value::from(1)).unwrap(), Value::from(2));
        assert_eq!(f.call(vec![Value::from(1)]).unwrap(), Value::from(2));

        let error = f.call(vec![Value::from(1), Value::from(2)]).unwrap_err();
        assert_eq!(error.validation_error().unwrap().kind, ErrorKind::ArityMismatch);

        let error = f.call(()).unwrap_err();
        assert_eq!(error.validation_error().unwrap().kind, ErrorKind::RequiredValue);
    }

    #[test]
    fn test_input_model_deserializes_by_shape() {
        let positional: InputModel = serde_json::from_value(json!(["number", "string"])).unwrap();
        assert!(matches!(positional, InputModel::Positional(ref m) if m.len() == 2));

        let single: InputModel = serde_json::from_value(json!({"type": "array"})).unwrap();
        assert!(matches!(single, InputModel::Single(_)));

        let keyed: InputModel = serde_json::from_value(json!({"a": "number", "b": "number"})).unwrap();
        assert!(matches!(keyed, InputModel::Keyed(ref m) if m.len() == 2));
    }

    #[test]
    fn test_call_error_propagates_unchanged() {
        let f = ValidatedFn::from_fn(|_| anyhow::bail!("boom"));
        let error = f.call(()).unwrap_err();
        assert!(matches!(error, FuncError::Call(_)));
        assert_eq!(error.to_string(), "boom");
    }

    #[test]
    fn test_into_callable_validates() {
        let callable = increment().into_callable();
        assert_eq!(callable.call(&[Value::from(4)]).unwrap(), Value::from(5));
        assert!(callable.call(&[Value::from("a")]).is_err());
    }
}
