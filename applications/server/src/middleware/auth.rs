/// Authentication middleware
use crate::{
    error::ServerError,
    services::{Session, SessionService},
};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use top100_core::UserId;

/// Extension type to store the verified session in the request
/// Can be used as an extractor in handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Session);

impl AuthenticatedUser {
    pub fn user_id(&self) -> &UserId {
        &self.0.user_id
    }

    pub fn session(&self) -> &Session {
        &self.0
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Middleware that requires a valid session token in the Authorization header
pub async fn auth_middleware(
    State(sessions): State<Arc<SessionService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = bearer_token(request.headers()).ok_or(StatusCode::UNAUTHORIZED)?;

    let session = sessions.verify(token).map_err(|e| {
        tracing::warn!("Session verification failed: {}", e);
        StatusCode::UNAUTHORIZED
    })?;

    request.extensions_mut().insert(AuthenticatedUser(session));

    Ok(next.run(request).await)
}

/// Middleware that attaches the session when a valid token is present
///
/// Requests without a token, or with an invalid one, continue anonymously.
pub async fn optional_auth_middleware(
    State(sessions): State<Arc<SessionService>>,
    mut request: Request,
    next: Next,
) -> Response {
    let verified = bearer_token(request.headers()).map(|token| sessions.verify(token));

    match verified {
        Some(Ok(session)) => {
            request.extensions_mut().insert(AuthenticatedUser(session));
        }
        Some(Err(e)) => tracing::debug!("Ignoring invalid session: {}", e),
        None => {}
    }

    next.run(request).await
}

/// Implement FromRequestParts so AuthenticatedUser can be used as an extractor
#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ServerError::Auth("Not authenticated".to_string()))
    }
}
