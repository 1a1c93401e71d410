/// Sign-in API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    services::IssuedSession,
    state::AppState,
};
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect},
    Json,
};
use serde::{Deserialize, Serialize};
use top100_core::{UpsertUser, UserId};
use uuid::Uuid;

/// Cookie holding the sign-in state between login and callback
pub const STATE_COOKIE: &str = "oauth_state";

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_token: String,
    pub user_id: UserId,
    pub expires_at: i64,
}

impl SessionResponse {
    fn new(user_id: UserId, issued: IssuedSession) -> Self {
        Self {
            session_token: issued.token,
            user_id,
            expires_at: issued.expires_at,
        }
    }
}

fn state_cookie(value: &str, max_age: u32) -> String {
    format!(
        "{}={}; Path=/api/auth; HttpOnly; SameSite=Lax; Max-Age={}",
        STATE_COOKIE, value, max_age
    )
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// GET /api/auth/login
/// Redirect to the provider's consent page
pub async fn login(State(app_state): State<AppState>) -> Result<impl IntoResponse> {
    let state = Uuid::new_v4().simple().to_string();
    let url = app_state.catalog.authorize_url(&state)?;

    tracing::debug!("Redirecting to provider sign-in");

    Ok((
        [(header::SET_COOKIE, state_cookie(&state, 600))],
        Redirect::to(url.as_str()),
    ))
}

/// GET /api/auth/callback
/// Complete sign-in and issue a session token
pub async fn callback(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<CallbackParams>,
) -> Result<impl IntoResponse> {
    if let Some(error) = params.error {
        return Err(ServerError::Auth(format!("Sign-in was denied: {}", error)));
    }

    let code = params
        .code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| ServerError::BadRequest("Missing authorization code".to_string()))?;

    let expected = cookie_value(&headers, STATE_COOKIE);
    if expected.is_none() || expected != params.state.as_deref() {
        return Err(ServerError::Auth("Sign-in state mismatch".to_string()));
    }

    let tokens = app_state.catalog.exchange_code(&code).await?;
    let profile = app_state.catalog.current_profile(&tokens.access_token).await?;
    let user_id = UserId::new(profile.id);

    // Sign-in still succeeds if the user row cannot be written
    if let Err(e) = app_state
        .db
        .upsert_user(UpsertUser {
            id: user_id.clone(),
            display_name: profile.display_name,
            profile_image: profile.image_url,
        })
        .await
    {
        tracing::error!("Failed to store user {}: {}", user_id, e);
    }

    let issued = app_state.sessions.issue(&user_id, &tokens)?;
    tracing::info!("User {} signed in", user_id);

    Ok((
        [(header::SET_COOKIE, state_cookie("", 0))],
        Json(SessionResponse::new(user_id, issued)),
    ))
}

/// POST /api/auth/refresh
/// Renew the provider access token and reissue the session
pub async fn refresh(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<SessionResponse>> {
    let refresh_token = auth
        .session()
        .refresh_token
        .as_deref()
        .ok_or_else(|| ServerError::Auth("Session cannot be refreshed".to_string()))?;

    let tokens = app_state.catalog.refresh(refresh_token).await?;
    let issued = app_state.sessions.issue(auth.user_id(), &tokens)?;

    tracing::debug!("Session refreshed for {}", auth.user_id());

    Ok(Json(SessionResponse::new(auth.user_id().clone(), issued)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn finds_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; oauth_state=abc123; lang=en"),
        );

        assert_eq!(cookie_value(&headers, STATE_COOKIE), Some("abc123"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn state_cookie_is_scoped_to_auth_routes() {
        let cookie = state_cookie("xyz", 600);
        assert!(cookie.starts_with("oauth_state=xyz;"));
        assert!(cookie.contains("Path=/api/auth"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=600"));
    }
}
