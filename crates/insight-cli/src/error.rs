//! CLI error types.

use insight_core::ErrorKind;
use thiserror::Error;

/// CLI errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Query or dataset error from the engine.
    #[error("{0}")]
    Core(#[from] insight_core::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed dataset file.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl CliError {
    /// Process exit code for this error.
    ///
    /// Each engine error kind gets its own code so scripts can tell a bad
    /// query from an oversized result.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Core(e) => match e.kind() {
                ErrorKind::Structural => 10,
                ErrorKind::Semantic => 11,
                ErrorKind::ResultTooLarge => 12,
                ErrorKind::NotFound => 13,
                ErrorKind::InvalidDataset => 14,
            },
            CliError::Io(_) | CliError::Json(_) => 1,
            CliError::Config(_) => 2,
        }
    }
}

/// Result type for the CLI.
pub type Result<T> = std::result::Result<T, CliError>;
