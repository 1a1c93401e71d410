/// Playlist domain types
use crate::error::{Result, Top100Error};
use crate::types::{PlaylistId, Track, UpsertTrack, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Maximum number of tracks in a playlist
pub const MAX_PLAYLIST_TRACKS: usize = 100;

/// Title used when a save does not provide one
pub const DEFAULT_PLAYLIST_TITLE: &str = "My Top 100 Tracks";

/// Playlist row. Each user owns at most one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Owner user ID (unique across playlists)
    pub owner_id: UserId,

    /// Playlist title
    pub title: String,

    /// Last save timestamp
    pub updated_at: DateTime<Utc>,
}

/// Owner fields denormalized onto the public view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistOwner {
    pub display_name: Option<String>,
    pub profile_image: Option<String>,
}

/// Playlist header of the public view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSummary {
    pub id: PlaylistId,
    pub title: String,
    pub owner_id: UserId,
    pub updated_at: DateTime<Utc>,
    pub owner: PlaylistOwner,
}

/// Link row joined with its canonical track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistEntry {
    /// Position in the playlist (0-indexed)
    pub position: u32,
    pub track: Track,
}

/// Read-only public view of a saved playlist, ordered by position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicPlaylist {
    pub playlist: PlaylistSummary,
    pub tracks: Vec<PlaylistEntry>,
}

/// Data for a full playlist save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavePlaylist {
    pub owner_id: UserId,
    pub title: String,
    /// Tracks in editor order; the index becomes the stored position
    pub tracks: Vec<UpsertTrack>,
}

impl SavePlaylist {
    /// Build a save request, falling back to the default title when blank
    pub fn new(owner_id: UserId, title: Option<String>, tracks: Vec<UpsertTrack>) -> Self {
        let title = title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_PLAYLIST_TITLE.to_string());

        Self {
            owner_id,
            title,
            tracks,
        }
    }

    /// Check the size limit and that no catalog id appears twice
    pub fn validate(&self) -> Result<()> {
        if self.tracks.len() > MAX_PLAYLIST_TRACKS {
            return Err(Top100Error::PlaylistFull {
                limit: MAX_PLAYLIST_TRACKS,
            });
        }

        let mut seen = HashSet::with_capacity(self.tracks.len());
        for track in &self.tracks {
            if !seen.insert(&track.catalog_id) {
                return Err(Top100Error::DuplicateTrack(track.catalog_id.clone()));
            }
        }

        Ok(())
    }
}

/// Result of a completed save
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPlaylist {
    pub playlist: Playlist,
    pub track_count: usize,
}
