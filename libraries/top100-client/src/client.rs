//! Main Top 100 server client.

use crate::error::{ClientError, Result};
use crate::types::{
    CastVoteRequest, ClientConfig, ErrorBody, HealthResponse, SavePlaylistRequest,
    SavePlaylistResponse, SearchResponse, SessionResponse, VoteReceipt,
};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use top100_core::types::{CatalogTrack, PlaylistId, PublicPlaylist, TrackId, UserId, VoteValue};
use tracing::{debug, info, warn};

/// Client for a Top 100 server.
///
/// Cheap to clone; clones share the session token.
///
/// # Example
///
/// ```ignore
/// use top100_client::{ClientConfig, Top100Client};
///
/// let client = Top100Client::new(ClientConfig::with_session("https://top100.example.com", token))?;
/// let results = client.search("bohemian rhapsody").await?;
/// ```
#[derive(Clone)]
pub struct Top100Client {
    http: Client,
    base_url: Arc<str>,
    session_token: Arc<RwLock<Option<String>>>,
}

impl Top100Client {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let url = config.url.trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        url::Url::parse(&url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Top100Client/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: url.into(),
            session_token: Arc::new(RwLock::new(config.session_token)),
        })
    }

    /// Get the server URL.
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Check if the client has a session token.
    pub async fn is_authenticated(&self) -> bool {
        self.session_token.read().await.is_some()
    }

    pub async fn session_token(&self) -> Option<String> {
        self.session_token.read().await.clone()
    }

    /// Set the session token directly (e.g., after the sign-in redirect).
    pub async fn set_session_token(&self, token: impl Into<String>) {
        *self.session_token.write().await = Some(token.into());
    }

    /// Clear the stored session (sign out).
    pub async fn clear_session(&self) {
        *self.session_token.write().await = None;
        info!("Signed out");
    }

    /// Check that the server is up. Does not require a session.
    pub async fn health(&self) -> Result<HealthResponse> {
        let request = self.http.get(self.endpoint("/api/health"));
        self.send(request, false).await
    }

    /// Search the catalog through the server.
    pub async fn search(&self, query: &str) -> Result<Vec<CatalogTrack>> {
        debug!(query = %query, "Searching tracks");
        let request = self
            .http
            .get(self.endpoint("/api/search"))
            .query(&[("q", query)]);
        let response: SearchResponse = self.send(request, true).await?;
        Ok(response.tracks)
    }

    /// Replace the caller's playlist with `tracks`, in order.
    pub async fn save_playlist(
        &self,
        title: Option<&str>,
        tracks: &[CatalogTrack],
    ) -> Result<SavePlaylistResponse> {
        let request = self
            .http
            .put(self.endpoint("/api/me/playlist"))
            .json(&SavePlaylistRequest { title, tracks });
        let response: SavePlaylistResponse = self.send(request, true).await?;

        info!(
            playlist_id = %response.playlist_id,
            tracks = response.track_count,
            "Playlist saved"
        );
        Ok(response)
    }

    /// The caller's saved playlist, or `None` if nothing was saved yet.
    pub async fn my_playlist(&self) -> Result<Option<PublicPlaylist>> {
        let request = self.http.get(self.endpoint("/api/me/playlist"));
        match self.send(request, true).await {
            Ok(playlist) => Ok(Some(playlist)),
            Err(ClientError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Another user's playlist. Does not require a session.
    pub async fn public_playlist(&self, user_id: &UserId) -> Result<PublicPlaylist> {
        let request = self
            .http
            .get(self.endpoint(&format!("/api/users/{}/playlist", user_id)));
        self.send(request, false).await
    }

    /// Submit a vote. Sent with the session token when one is held.
    pub async fn cast_vote(
        &self,
        playlist_id: &PlaylistId,
        track_id: &TrackId,
        vote: VoteValue,
        visitor_id: Option<&str>,
    ) -> Result<VoteReceipt> {
        let request = self
            .http
            .post(self.endpoint(&format!("/api/playlists/{}/votes", playlist_id)))
            .json(&CastVoteRequest {
                track_id,
                vote,
                session_id: visitor_id,
            });
        self.send(request, false).await
    }

    /// Exchange the current session for a fresh one with a renewed provider token.
    pub async fn refresh_session(&self) -> Result<SessionResponse> {
        let request = self.http.post(self.endpoint("/api/auth/refresh"));
        let session: SessionResponse = self.send(request, true).await?;

        self.set_session_token(session.session_token.clone()).await;
        debug!(user_id = %session.user_id, "Session refreshed");
        Ok(session)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the session token and decode the response.
    ///
    /// With `require_session` the call fails locally when no token is held;
    /// otherwise the token is attached only if present.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        require_session: bool,
    ) -> Result<T> {
        let token = self.session_token.read().await.clone();
        let request = match token {
            Some(token) => request.bearer_auth(token),
            None if require_session => return Err(ClientError::AuthRequired),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                ClientError::ServerUnreachable(e.to_string())
            } else {
                ClientError::Request(e)
            }
        })?;

        handle_response(response).await
    }
}

async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();

    if status.is_success() {
        return response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()));
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);

    match status.as_u16() {
        400 => Err(ClientError::BadRequest(message)),
        401 => Err(ClientError::AuthRequired),
        404 => Err(ClientError::NotFound(message)),
        code => {
            warn!(status = code, error = %message, "Server request failed");
            Err(ClientError::ServerError {
                status: code,
                message,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_validation() {
        assert!(Top100Client::new(ClientConfig::new("https://example.com")).is_ok());
        assert!(Top100Client::new(ClientConfig::new("http://localhost:8080")).is_ok());

        assert!(Top100Client::new(ClientConfig::new("")).is_err());
        assert!(Top100Client::new(ClientConfig::new("not-a-url")).is_err());
        assert!(Top100Client::new(ClientConfig::new("ftp://example.com")).is_err());
    }

    #[test]
    fn test_url_normalization() {
        let client =
            Top100Client::new(ClientConfig::new("https://example.com/")).expect("valid url");
        assert_eq!(client.url(), "https://example.com");
    }
}
