//! Error types for the Top 100 client.

use thiserror::Error;

/// Errors that can occur when talking to a Top 100 server.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server rejected the request as invalid
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No session token, or the server rejected it
    #[error("Authentication required")]
    AuthRequired,

    /// Addressed resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Server returned another error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),

    /// Local cache failure
    #[error(transparent)]
    Local(#[from] top100_core::Top100Error),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
