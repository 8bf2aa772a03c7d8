//! Error types and handling framework.
//!
//! The error system is organized hierarchically:
//! - `TallyError` - Top-level error type
//!   - `TransportError` - Feed connection errors
//!   - `DataError` - Payload decoding and validation errors
//!   - `ConfigError` - Configuration errors
//!
//! Connection and payload failures are never surfaced through the
//! subscribe/snapshot contracts; they are logged and reflected in observable
//! state. These types exist for the seams where an error *is* the result:
//! transport dialing, config loading, payload decoding.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error severity levels for categorizing errors.
///
/// - `Fatal`: the operation cannot be retried (e.g. an exhausted retry budget)
/// - `Recoverable`: the operation can be retried or recovered from
/// - `Warning`: a non-critical issue worth logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ErrorSeverity {
    /// Unrecoverable without explicit operator action.
    Fatal,

    /// Can be retried or recovered from automatically.
    #[default]
    Recoverable,

    /// Logged and ignored; does not prevent operation.
    Warning,
}

impl ErrorSeverity {
    /// Returns true if this error is recoverable (not fatal).
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Fatal)
    }

    /// Returns true if this error is fatal.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal)
    }

    /// Returns the severity as a static string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fatal => "FATAL",
            Self::Recoverable => "RECOVERABLE",
            Self::Warning => "WARNING",
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

mod config;
mod data;
mod transport;

pub use config::ConfigError;
pub use data::DataError;
pub use transport::TransportError;

/// Top-level error type for the tally synchronization layer.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TallyError {
    /// Feed connection error.
    #[error("{0}")]
    Transport(#[from] TransportError),

    /// Payload decoding or validation error.
    #[error("{0}")]
    Data(#[from] DataError),

    /// Configuration error.
    #[error("{0}")]
    Config(#[from] ConfigError),
}

impl TallyError {
    /// Returns the severity level of this error.
    #[must_use]
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Transport(e) => e.severity(),
            Self::Data(e) => e.severity(),
            Self::Config(e) => e.severity(),
        }
    }

    /// Returns true if this error is recoverable.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        self.severity().is_recoverable()
    }

    /// Returns the error category as a string.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Data(_) => "data",
            Self::Config(_) => "config",
        }
    }

    /// Returns the inner transport error, if this is a transport error.
    #[must_use]
    pub fn as_transport_error(&self) -> Option<&TransportError> {
        match self {
            Self::Transport(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the inner data error, if this is a data error.
    #[must_use]
    pub fn as_data_error(&self) -> Option<&DataError> {
        match self {
            Self::Data(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the inner config error, if this is a config error.
    #[must_use]
    pub fn as_config_error(&self) -> Option<&ConfigError> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

/// A specialized Result type for tally operations.
pub type Result<T> = std::result::Result<T, TallyError>;
