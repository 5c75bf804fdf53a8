//! Reading values and models from YAML and JSON files
//!
//! The format is chosen from the file extension. Object keys keep their
//! document order.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use modelguard_schemas::loader;
//! use modelguard_schemas::{FailureMode, Validator};
//! use std::path::Path;
//!
//! let model = loader::load_model(Path::new("user.model.yaml"))?;
//! let value = loader::load_value(Path::new("user.json"))?;
//! Validator::global().validate(&value, &model, FailureMode::Raise)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Copyright (c) 2025 Modelguard Team
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod parser;

pub use error::{LoaderError, LoaderResult};
pub use parser::{DocumentParser, Format};

use crate::model::Model;
use crate::value::Value;
use std::path::Path;

/// Read a value from a `.json`, `.yaml` or `.yml` file
pub fn load_value(path: &Path) -> LoaderResult<Value> {
    DocumentParser::new().load_value(path)
}

/// Read a model from a `.json`, `.yaml` or `.yml` file
pub fn load_model(path: &Path) -> LoaderResult<Model> {
    DocumentParser::new().load_model(path)
}
