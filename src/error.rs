//! Error types for respack
//!
//! Provides a unified error type for all operations, plus the terminal
//! [`ConnectionError`] raised when a socket write fails.

use std::io;
use thiserror::Error;

/// Result type alias using RespackError
pub type Result<T> = std::result::Result<T, RespackError>;

/// Code reported when the platform error carries no OS errno
pub const UNKNOWN_ERROR_CODE: &str = "UNKNOWN";

/// Unified error type for respack operations
#[derive(Debug, Error)]
pub enum RespackError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    // -------------------------------------------------------------------------
    // Encoding Errors
    // -------------------------------------------------------------------------
    #[error("Encode error: {0}")]
    Encode(String),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A failed socket write (or connect) on the send path.
///
/// By the time this value reaches the caller the connection has already been
/// closed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error {code} while writing to socket. {message}.")]
pub struct ConnectionError {
    /// OS errno in decimal, or `UNKNOWN`
    pub code: String,

    /// Human-readable description of the failure
    pub message: String,
}

impl ConnectionError {
    /// Build an error from an explicit (code, message) pair
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Build an error that carries only a message
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(UNKNOWN_ERROR_CODE, message)
    }
}

impl From<&io::Error> for ConnectionError {
    fn from(err: &io::Error) -> Self {
        match err.raw_os_error() {
            Some(errno) => {
                // Display for OS errors appends " (os error N)", which would
                // repeat the code.
                let message = io::Error::from_raw_os_error(errno).to_string();
                let message = message
                    .strip_suffix(&format!(" (os error {})", errno))
                    .map(str::to_string)
                    .unwrap_or(message);
                Self::new(errno.to_string(), message)
            }
            None => Self::unknown(err.to_string()),
        }
    }
}

impl From<io::Error> for ConnectionError {
    fn from(err: io::Error) -> Self {
        Self::from(&err)
    }
}
