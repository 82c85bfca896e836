//! Error types for loading and building surface definitions.

use thiserror::Error;

use crate::validate::ValidationError;

/// Errors that can occur while loading or building a definition.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The definition failed validation.
    #[error("invalid definition: {}", join(.0))]
    InvalidDefinition(Vec<ValidationError>),

    /// A command path named no command of the tree.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Convenience alias for results with [`SurfaceError`].
pub type Result<T> = std::result::Result<T, SurfaceError>;
