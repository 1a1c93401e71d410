//! Types for Top 100 API requests and responses.

use serde::{Deserialize, Serialize};
use top100_core::types::{CatalogTrack, PlaylistId, TrackId, UserId, VoteValue};

/// Configuration for connecting to a Top 100 server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the server (e.g., "https://top100.example.com")
    pub url: String,
    /// Session token from sign-in
    pub session_token: Option<String>,
}

impl ClientConfig {
    /// Create a new config with just the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            session_token: None,
        }
    }

    /// Create a config with an existing session token.
    pub fn with_session(url: impl Into<String>, session_token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            session_token: Some(session_token.into()),
        }
    }
}

// =============================================================================
// Session
// =============================================================================

/// Session issued at sign-in or refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_token: String,
    pub user_id: UserId,
    /// Unix timestamp (seconds) when the session expires
    pub expires_at: i64,
}

/// Server health.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

// =============================================================================
// Search
// =============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub tracks: Vec<CatalogTrack>,
}

// =============================================================================
// Playlists
// =============================================================================

/// Request body for saving the caller's playlist.
#[derive(Debug, Serialize)]
pub struct SavePlaylistRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    pub tracks: &'a [CatalogTrack],
}

/// Result of a save.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePlaylistResponse {
    pub playlist_id: PlaylistId,
    pub track_count: usize,
}

// =============================================================================
// Votes
// =============================================================================

/// Request body for casting a vote.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteRequest<'a> {
    pub track_id: &'a TrackId,
    pub vote: VoteValue,
    /// Anonymous visitor id; ignored by the server for signed-in callers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<&'a str>,
}

/// Vote as recorded by the server.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteReceipt {
    pub playlist_id: PlaylistId,
    pub track_id: TrackId,
    pub vote: VoteValue,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
