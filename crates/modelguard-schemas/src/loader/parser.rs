//! Document parsing for YAML and JSON formats
//!
//! Copyright (c) 2025 Modelguard Team
//! Licensed under the Apache-2.0 license

use crate::loader::error::{LoaderError, LoaderResult};
use crate::model::Model;
use crate::value::Value;
use std::path::Path;
use tracing::debug;

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// YAML format (.yaml, .yml)
    Yaml,
    /// JSON format (.json)
    Json,
}

impl Format {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> LoaderResult<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            _ => Err(LoaderError::unsupported_format(path.to_path_buf())),
        }
    }

    /// Get file extensions for this format
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Format::Yaml => &["yaml", "yml"],
            Format::Json => &["json"],
        }
    }
}

/// Parser turning documents into values and models
#[derive(Debug, Default)]
pub struct DocumentParser;

impl DocumentParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a file, detecting format from extension
    pub fn parse_file(&self, path: &Path) -> LoaderResult<serde_json::Value> {
        let format = Format::from_path(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| LoaderError::io_error(path.to_path_buf(), e))?;

        debug!(path = %path.display(), ?format, "parsing document");
        self.parse_content(&content, format, path)
    }

    /// Parse content with explicit format
    pub fn parse_content(&self, content: &str, format: Format, path: &Path) -> LoaderResult<serde_json::Value> {
        match format {
            Format::Yaml => self.parse_yaml(content, path),
            Format::Json => self.parse_json(content, path),
        }
    }

    /// Parse YAML content
    pub fn parse_yaml(&self, content: &str, path: &Path) -> LoaderResult<serde_json::Value> {
        // YAML-specific errors surface before the conversion
        let yaml_value: serde_yaml::Value = serde_yaml::from_str(content)
            .map_err(|e| LoaderError::yaml_parse_error(path.to_path_buf(), e))?;

        serde_json::to_value(yaml_value)
            .map_err(|e| LoaderError::json_parse_error(path.to_path_buf(), e))
    }

    /// Parse JSON content
    pub fn parse_json(&self, content: &str, path: &Path) -> LoaderResult<serde_json::Value> {
        serde_json::from_str(content)
            .map_err(|e| LoaderError::json_parse_error(path.to_path_buf(), e))
    }

    /// Read a value to validate
    pub fn load_value(&self, path: &Path) -> LoaderResult<Value> {
        self.parse_file(path).map(Value::from)
    }

    /// Read a model
    pub fn load_model(&self, path: &Path) -> LoaderResult<Model> {
        let document = self.parse_file(path)?;
        Self::model_from_document(document, path)
    }

    /// Interpret a parsed document as a model
    pub fn model_from_document(document: serde_json::Value, path: &Path) -> LoaderResult<Model> {
        Model::from_document(document).map_err(|e| LoaderError::invalid_model(path.to_path_buf(), e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path(Path::new("model.yaml")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("model.YML")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("value.json")).unwrap(), Format::Json);
        assert!(Format::from_path(Path::new("model.toml")).is_err());
        assert!(Format::from_path(Path::new("model")).is_err());
        assert_eq!(Format::Yaml.extensions(), &["yaml", "yml"]);
    }

    #[test]
    fn test_load_yaml_model() {
        let file = temp_file(
            ".yaml",
            "type: object\nrequiredKeys: [id]\nchildren:\n  id: number\n  tags:\n    type: array\n    allChildren: string\n",
        );
        let model = DocumentParser::new().load_model(file.path()).unwrap();
        let spec = model.as_spec().unwrap();
        assert_eq!(spec.type_name, "object");
        assert_eq!(spec.required_keys.as_deref(), Some(&["id".to_string()][..]));
    }

    #[test]
    fn test_load_json_value() {
        let file = temp_file(".json", r#"{"b": 1, "a": [true, null]}"#);
        let value = DocumentParser::new().load_value(file.path()).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_invalid_model_is_reported() {
        let file = temp_file(".json", "[]");
        let error = DocumentParser::new().load_model(file.path()).unwrap_err();
        assert!(matches!(error, LoaderError::InvalidModel { .. }));

        let file = temp_file(".json", "{not json");
        let error = DocumentParser::new().load_model(file.path()).unwrap_err();
        assert!(matches!(error, LoaderError::JsonParseError { .. }));
    }

    #[test]
    fn test_missing_file() {
        let error = DocumentParser::new().load_value(Path::new("/nonexistent/value.json")).unwrap_err();
        assert!(matches!(error, LoaderError::IoError { .. }));
    }
}
