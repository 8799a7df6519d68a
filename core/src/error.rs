use std::path::PathBuf;

use thiserror::Error;

/// Manifest generation error types
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Malformed repo tag record
    #[error("Parse error on line {line}, column {column}: {message}")]
    ParseError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Pulling a requested image failed
    #[error("Failed to pull {reference}: {message}")]
    AcquisitionError { reference: String, message: String },

    /// Listing the local images failed
    #[error("Failed to list local images: {0}")]
    EnumerationError(String),

    /// Creating or writing the manifest file failed
    #[error("Failed to write manifest to {}: {source}", path.display())]
    OutputError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ManifestError {
    fn from(err: serde_json::Error) -> Self {
        ManifestError::SerializationError(err.to_string())
    }
}

/// Result type alias for manifest operations
pub type Result<T> = std::result::Result<T, ManifestError>;
