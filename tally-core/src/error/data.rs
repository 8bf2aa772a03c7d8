//! Payload decoding and validation error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Data error type for inbound feed payloads.
///
/// A payload that fails decoding or validation is discarded whole; these
/// errors are logged by the synchronizers and never mutate view state.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataError {
    /// Failed to decode a payload.
    #[error("[Data] Decode failed ({context}): {reason}")]
    DecodeFailed {
        /// What was being decoded (event name or frame kind).
        context: String,
        /// Reason for the decode failure.
        reason: String,
    },

    /// Payload shape validation failed.
    #[error("[Data] Validation failed: {field} - {reason}")]
    ValidationFailed {
        /// Field that failed validation.
        field: String,
        /// Reason for the validation failure.
        reason: String,
    },

    /// Required data is missing.
    #[error("[Data] Missing data: {description}")]
    MissingData {
        /// Description of the missing data.
        description: String,
    },
}

impl DataError {
    /// Returns the severity level of this error.
    ///
    /// Invalid payloads are dropped and the previous state stands, so none
    /// of these is more than a warning.
    #[must_use]
    pub fn severity(&self) -> super::ErrorSeverity {
        super::ErrorSeverity::Warning
    }
}
