//! Error types for kmem-client.

use kmem_core::DecodeError;
use thiserror::Error;

/// Failure to exchange bytes with the service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request failed: {0}")]
    Request(String),

    /// The request could not be built (bad header value, bad MIME type, ...).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout(_))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout(e.to_string())
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else if e.is_builder() {
            TransportError::InvalidRequest(e.to_string())
        } else {
            TransportError::Request(e.to_string())
        }
    }
}

/// Main error type for kmem-client.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// A body did not decode under the type declared for its status.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Status missing from the operation's table, with the raising flag on.
    #[error("Unexpected status {status}: {}", String::from_utf8_lossy(.body))]
    UnexpectedStatus { status: u16, body: Vec<u8> },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using kmem-client's Error.
pub type Result<T> = std::result::Result<T, Error>;
