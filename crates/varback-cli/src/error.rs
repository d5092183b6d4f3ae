//! CLI error types.

use std::path::Path;

use thiserror::Error;
use varback_risk::RiskError;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid date format.
    #[error("Invalid date format: {0}. Use YYYY-MM-DD.")]
    InvalidDate(String),

    /// Malformed price file.
    #[error("Invalid price data in {path}: {reason}")]
    Data {
        /// File being read.
        path: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Risk computation error.
    #[error(transparent)]
    Risk(#[from] RiskError),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Creates a data error for `path`.
    pub fn data(path: &Path, reason: impl Into<String>) -> Self {
        Self::Data {
            path: path.display().to_string(),
            reason: reason.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config(reason.into())
    }
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
