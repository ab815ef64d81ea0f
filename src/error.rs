//! Error types for blockgen

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// blockgen errors
///
/// Every generation error aborts the whole pass; nothing partial is returned.
#[derive(Error, Debug)]
pub enum Error {
    #[error("No emission rule for block type '{block_type}' (block {block_id})")]
    UnknownNodeType { block_type: String, block_id: String },

    #[error("Block type '{block_type}' got unknown value '{value}' for field {field}")]
    UnknownEnumValue {
        block_type: String,
        field: String,
        value: String,
    },

    #[error("Block type '{block_type}' is missing required field {field}")]
    MissingField { block_type: String, field: String },

    #[error("A generation pass is already running on this generator")]
    AlreadyGenerating,

    #[error("No generation pass is running; call begin_generation first")]
    NotGenerating,

    #[error("A rule for block type '{0}' is already registered")]
    DuplicateRule(String),

    #[error("Expected {expected} code from block type '{block_type}'")]
    UnexpectedCode {
        block_type: String,
        expected: &'static str,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_norway::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn unknown_enum(
        block_type: &str,
        field: &str,
        value: impl Into<String>,
    ) -> Self {
        Error::UnknownEnumValue {
            block_type: block_type.to_string(),
            field: field.to_string(),
            value: value.into(),
        }
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}
