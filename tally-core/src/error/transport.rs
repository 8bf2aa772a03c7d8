//! Feed-connection error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Transport error type covering connection failures, timeouts, dropped
/// links, and an exhausted reconnection budget.
///
/// # Examples
///
/// ```
/// use tally_core::error::TransportError;
///
/// let error = TransportError::ConnectionFailed {
///     reason: "Connection refused".to_string(),
/// };
/// assert!(error.to_string().contains("Connection refused"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportError {
    /// Connection to the feed server failed.
    #[error("[Transport] Connection failed: {reason}")]
    ConnectionFailed {
        /// Reason for the connection failure.
        reason: String,
    },

    /// Connection attempt timed out.
    #[error("[Transport] Connection timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// An established connection was closed.
    #[error("[Transport] Connection closed: {reason}")]
    ConnectionClosed {
        /// Reason for the closure.
        reason: String,
    },

    /// A frame-level WebSocket error occurred.
    #[error("[Transport] Frame error: {reason}")]
    Frame {
        /// Reason for the frame error.
        reason: String,
    },

    /// The reconnection budget was exhausted; the connection is terminal
    /// until a fresh acquisition.
    #[error("[Transport] Retries exhausted after {attempts} attempts")]
    RetriesExhausted {
        /// Number of attempts made before giving up.
        attempts: u32,
    },
}

impl TransportError {
    /// Returns true if this error is recoverable via the reconnection policy.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::RetriesExhausted { .. })
    }

    /// Returns the severity level of this error.
    #[must_use]
    pub fn severity(&self) -> super::ErrorSeverity {
        use super::ErrorSeverity;
        match self {
            Self::RetriesExhausted { .. } => ErrorSeverity::Fatal,
            Self::ConnectionFailed { .. }
            | Self::Timeout { .. }
            | Self::ConnectionClosed { .. }
            | Self::Frame { .. } => ErrorSeverity::Recoverable,
        }
    }
}
