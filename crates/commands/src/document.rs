//! Input document for `set-variables`
//!
//! The document is a flat JSON object mapping variable names to primitive
//! values. Entries keep the order they have in the file.

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::{Map, Number, Value};

use ci_sync_runtime::deps::FileSystem;

/// Errors raised while loading the input document; all are fatal
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The file does not exist
    #[error("variables file not found: {}", path.display())]
    Missing {
        /// Path that was looked up
        path: PathBuf,
    },

    /// The file exists but could not be read
    #[error("failed to read variables file {}: {reason}", path.display())]
    Read {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O failure
        reason: String,
    },

    /// The file is not valid JSON
    #[error("variables file {} is not valid JSON: {source}", path.display())]
    Parse {
        /// Path that was parsed
        path: PathBuf,
        /// Parser error with line and column
        source: serde_json::Error,
    },

    /// The top-level value is not an object
    #[error("variables file {} must contain a JSON object, found {found}", path.display())]
    NotAnObject {
        /// Path that was parsed
        path: PathBuf,
        /// Kind of the top-level value
        found: &'static str,
    },
}

/// A primitive value accepted as a variable value
#[derive(Debug, Clone, PartialEq)]
pub enum VariableValue {
    /// JSON string, sent as-is
    String(String),
    /// JSON number, sent in its JSON text form
    Number(Number),
    /// JSON boolean, sent as `true` or `false`
    Bool(bool),
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// One variable to upload
#[derive(Debug, Clone, PartialEq)]
pub struct VariableEntry {
    /// Variable name
    pub key: String,
    /// Variable value
    pub value: VariableValue,
}

/// An entry excluded because its value is not a primitive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Variable name
    pub key: String,
    /// Kind of the rejected value (`null`, `object` or `array`)
    pub kind: &'static str,
}

/// Parsed input document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputDocument {
    /// Entries to upload, in file order
    pub entries: Vec<VariableEntry>,
    /// Entries excluded from processing, in file order
    pub skipped: Vec<SkippedEntry>,
}

impl InputDocument {
    /// Read and parse the document at `path`
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self, DocumentError> {
        if !fs.exists(path) {
            return Err(DocumentError::Missing {
                path: path.to_path_buf(),
            });
        }

        let content = fs.read_to_string(path).map_err(|e| DocumentError::Read {
            path: path.to_path_buf(),
            reason: format!("{e:#}"),
        })?;

        Self::parse(&content, path)
    }

    /// Parse document text; `path` is only used in error messages
    pub fn parse(content: &str, path: &Path) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(content).map_err(|source| DocumentError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            other => Err(DocumentError::NotAnObject {
                path: path.to_path_buf(),
                found: kind_of(&other),
            }),
        }
    }

    fn from_map(map: Map<String, Value>) -> Self {
        let mut document = Self::default();

        for (key, value) in map {
            let value = match value {
                Value::String(s) => VariableValue::String(s),
                Value::Number(n) => VariableValue::Number(n),
                Value::Bool(b) => VariableValue::Bool(b),
                other => {
                    document.skipped.push(SkippedEntry {
                        key,
                        kind: kind_of(&other),
                    });
                    continue;
                }
            };
            document.entries.push(VariableEntry { key, value });
        }

        document
    }
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
