use std::path::PathBuf;

use thiserror::Error;

/// Reasons a policy document is rejected.
///
/// Every variant aborts the whole load; no partially validated policy set is
/// ever produced.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("document is not valid JSON: {0}")]
    NotJson(#[source] serde_json::Error),

    #[error("top-level value must be an array of policies, found {found}")]
    NotArray { found: &'static str },

    #[error("policy #{index} is invalid: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("policy #{index} has an invalid email {value:?}: {reason}")]
    InvalidEmail {
        index: usize,
        value: String,
        reason: &'static str,
    },

    #[error("policy #{index} for {email} has an invalid path restriction {pattern:?}: {source}")]
    InvalidPattern {
        index: usize,
        email: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl FormatError {
    /// Short, stable name of the error kind, used in logs and CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            FormatError::NotJson(_) => "NotJSON",
            FormatError::NotArray { .. } => "NotArray",
            FormatError::InvalidRecord { .. } => "InvalidRecord",
            FormatError::InvalidEmail { .. } => "InvalidEmail",
            FormatError::InvalidPattern { .. } => "InvalidPattern",
        }
    }
}

#[derive(Error, Debug)]
pub enum AclError {
    #[error("invalid policy document: {0}")]
    Format(#[from] FormatError),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid engine configuration: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, AclError>;

/// JSON type name used in error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
