//! Page source error types

use thiserror::Error;

/// Error returned by a page source when a fetch fails.
///
/// The manager never retries or interprets these; it only passes them on.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct PageError {
    /// Error message
    pub message: String,
}

impl PageError {
    /// Create a new page error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for PageError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<String> for PageError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for PageError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}
