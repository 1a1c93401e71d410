/// API route modules
pub mod auth;
pub mod health;
pub mod playlists;
pub mod search;
pub mod votes;

use crate::error::{Result, ServerError};
use axum::extract::rejection::JsonRejection;
use axum::Json;

/// Unwrap a JSON body, reporting malformed input as 400
pub(crate) fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ServerError::BadRequest(rejection.body_text()))
}
