//! Configuration error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error type covering file I/O, parsing, and validation.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("[Config] Failed to read '{path}': {reason}")]
    Io {
        /// Path that failed to read.
        path: String,
        /// Reason for the I/O failure.
        reason: String,
    },

    /// Failed to parse configuration content.
    #[error("[Config] Parse error ({format}): {reason}")]
    Parse {
        /// Format that was being parsed.
        format: String,
        /// Reason for the parse failure.
        reason: String,
    },

    /// File extension does not map to a supported format.
    #[error("[Config] Unsupported format: {format}")]
    UnsupportedFormat {
        /// The unrecognized format or extension.
        format: String,
    },

    /// A required field is missing or invalid.
    #[error("[Config] Invalid field '{field}': {reason}")]
    InvalidField {
        /// Field that failed validation.
        field: String,
        /// Reason it is invalid.
        reason: String,
    },
}

impl ConfigError {
    /// Returns the severity level of this error.
    ///
    /// Configuration problems always need operator attention.
    #[must_use]
    pub fn severity(&self) -> super::ErrorSeverity {
        super::ErrorSeverity::Fatal
    }
}
