/// Track domain types
use crate::types::{CatalogTrackId, TrackId};
use serde::{Deserialize, Serialize};

/// A track as returned by the catalog search, normalized to a flat record.
///
/// This is also the entry type held by the playlist editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogTrack {
    /// Catalog identifier
    pub id: CatalogTrackId,

    /// Track title
    pub name: String,

    /// Artist names joined by ", "
    pub artist: String,

    /// Album title
    #[serde(default)]
    pub album: String,

    /// URL of the first album image
    pub album_art: Option<String>,

    /// 30-second preview clip, when the catalog provides one
    pub preview_url: Option<String>,

    /// Catalog URI (e.g. `spotify:track:...`)
    #[serde(default)]
    pub uri: String,
}

impl From<AgreedTrack> for CatalogTrack {
    fn from(stub: AgreedTrack) -> Self {
        Self {
            id: stub.id,
            name: stub.name,
            artist: stub.artist,
            album: String::new(),
            album_art: stub.album_art,
            preview_url: None,
            uri: String::new(),
        }
    }
}

impl From<Track> for CatalogTrack {
    fn from(track: Track) -> Self {
        Self {
            id: track.catalog_id,
            name: track.name,
            artist: track.artist,
            album: String::new(),
            album_art: track.album_art,
            preview_url: track.preview_url,
            uri: String::new(),
        }
    }
}

/// Canonical track row, deduplicated by catalog id and shared across playlists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: TrackId,
    pub catalog_id: CatalogTrackId,
    pub name: String,
    pub artist: String,
    pub album_art: Option<String>,
    pub preview_url: Option<String>,
}

/// Data for upserting a canonical track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertTrack {
    pub catalog_id: CatalogTrackId,
    pub name: String,
    pub artist: String,
    pub album_art: Option<String>,
    pub preview_url: Option<String>,
}

impl From<&CatalogTrack> for UpsertTrack {
    fn from(track: &CatalogTrack) -> Self {
        Self {
            catalog_id: track.id.clone(),
            name: track.name.clone(),
            artist: track.artist.clone(),
            album_art: track.album_art.clone(),
            preview_url: track.preview_url.clone(),
        }
    }
}

/// Stub kept in the agreed-tracks cache after an agreeing vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgreedTrack {
    /// Catalog identifier, so the stub can seed a new editor directly
    pub id: CatalogTrackId,
    pub name: String,
    pub artist: String,
    pub album_art: Option<String>,
}

impl From<&Track> for AgreedTrack {
    fn from(track: &Track) -> Self {
        Self {
            id: track.catalog_id.clone(),
            name: track.name.clone(),
            artist: track.artist.clone(),
            album_art: track.album_art.clone(),
        }
    }
}
