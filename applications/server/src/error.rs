/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use top100_catalog::CatalogError;
use top100_core::Top100Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 500 whose message is safe to show to the caller
    #[error("{0}")]
    Failed(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Domain error: {0}")]
    Core(#[from] Top100Error),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl From<top100_storage::StorageError> for ServerError {
    fn from(err: top100_storage::StorageError) -> Self {
        ServerError::Core(err.into())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ServerError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg),
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServerError::Failed(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ServerError::Core(e) if e.is_client_error() => (StatusCode::BAD_REQUEST, e.to_string()),
            ServerError::Core(e) if e.is_not_found() => (StatusCode::NOT_FOUND, e.to_string()),
            ServerError::Core(ref e) => {
                tracing::error!("Domain error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ServerError::Catalog(CatalogError::Unauthorized(ref msg)) => {
                tracing::warn!("Catalog rejected credentials: {}", msg);
                (
                    StatusCode::UNAUTHORIZED,
                    "Catalog session expired, sign in again".to_string(),
                )
            }
            ServerError::Catalog(CatalogError::MissingQuery) => (
                StatusCode::BAD_REQUEST,
                CatalogError::MissingQuery.to_string(),
            ),
            ServerError::Catalog(ref e) => {
                tracing::error!("Catalog error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Catalog request failed".to_string(),
                )
            }
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
            ServerError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ServerError::Jwt(ref e) => {
                tracing::debug!("JWT error: {:?}", e);
                (StatusCode::UNAUTHORIZED, "Invalid session".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
