//! Error types for the catalog client.

use thiserror::Error;

/// Errors returned by the streaming provider's accounts or catalog API.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Provider rejected the token, code, or client credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Provider returned another error status
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// Failed to parse provider response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid accounts or API URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Search query missing or blank
    #[error("Search query is required")]
    MissingQuery,
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
