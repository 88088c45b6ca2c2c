//! Error types for the no-ip client
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for no-ip client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the no-ip client
#[derive(Error, Debug)]
pub enum Error {
    /// The update request could not be built (malformed endpoint or URL)
    #[error("Request error: {0}")]
    Request(String),

    /// The update request could not be executed (DNS, connect, TLS, timeout, body read)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a request construction error
    pub fn request(msg: impl Into<String>) -> Self {
        Self::Request(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::Request(err.to_string())
    }
}
