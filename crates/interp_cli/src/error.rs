//! CLI error types

use interp_core::types::InterpError;
use thiserror::Error;

/// Errors surfaced by CLI commands
#[derive(Debug, Error)]
pub enum CliError {
    /// Input file does not exist
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Bad command-line argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration file could not be parsed or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Interpolation call failed
    #[error(transparent)]
    Interp(#[from] InterpError),

    /// Parallel and sequential runs disagreed
    #[error("Verification failed: {0}")]
    Verification(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON input or output error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV output error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<toml::de::Error> for CliError {
    fn from(e: toml::de::Error) -> Self {
        CliError::Config(e.to_string())
    }
}

/// Result alias for CLI commands
pub type Result<T> = std::result::Result<T, CliError>;
