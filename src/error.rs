//! Error handling for connection table processing.
//!
//! Provides structured error types with context for file access, JSON and
//! delimited-text parsing, header/schema resolution and configuration failures.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the connection processor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for connection table processing operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing or serialization failed
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Delimited-text parsing error
    #[error("Table parsing error in '{file}': {message}")]
    TableParsing {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// No header interpretation satisfies either table shape
    #[error("Unrecognized table schema in '{table}': {reason} (headers: [{headers}])")]
    UnrecognizedSchema {
        table: String,
        reason: String,
        headers: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Data validation error
    #[error("Data validation error: {message}")]
    DataValidation { message: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a JSON error with context
    pub fn json(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            message: message.into(),
            source,
        }
    }

    /// Create a table parsing error
    pub fn table_parsing(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::TableParsing {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an unrecognized schema error from the offending header row
    pub fn unrecognized_schema(
        table: impl Into<String>,
        reason: impl Into<String>,
        headers: &[String],
    ) -> Self {
        Self::UnrecognizedSchema {
            table: table.into(),
            reason: reason.into(),
            headers: headers.join(", "),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }

    /// True for the one condition callers must not paper over
    pub fn is_schema_error(&self) -> bool {
        matches!(self, Self::UnrecognizedSchema { .. })
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Json {
            message: "JSON processing failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::TableParsing {
            file: "unknown".to_string(),
            message: "Delimited text parsing failed".to_string(),
            source: Some(error),
        }
    }
}
