//! Error types for CLI operations.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading the records to export
#[derive(Error, Debug)]
pub enum CliError {
    /// Input file not found
    #[error("Input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    /// Input could not be read
    #[error("Failed to read input {source_name}: {source}")]
    InputRead {
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    /// Input is not a JSON array of string-valued objects
    #[error("Invalid records in {source_name}: {message}")]
    InputParse {
        source_name: String,
        message: String,
    },
}

impl CliError {
    pub fn input_not_found(path: impl Into<PathBuf>) -> Self {
        Self::InputNotFound { path: path.into() }
    }

    pub fn input_read(source_name: impl Into<String>, source: std::io::Error) -> Self {
        Self::InputRead {
            source_name: source_name.into(),
            source,
        }
    }

    pub fn input_parse(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InputParse {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
