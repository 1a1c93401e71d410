//! Track search against the provider catalog.

use crate::error::{CatalogError, Result};
use crate::oauth::check_status;
use crate::types::{CatalogConfig, SearchResponse, TrackObject};
use reqwest::Client;
use top100_core::types::{CatalogTrack, CatalogTrackId};
use tracing::debug;

/// Catalog search client.
pub struct SearchClient<'a> {
    http: &'a Client,
    config: &'a CatalogConfig,
}

impl<'a> SearchClient<'a> {
    pub(crate) fn new(http: &'a Client, config: &'a CatalogConfig) -> Self {
        Self { http, config }
    }

    /// Search tracks with the user's provider access token.
    ///
    /// Blank queries are rejected without calling the provider.
    pub async fn tracks(&self, access_token: &str, query: &str) -> Result<Vec<CatalogTrack>> {
        if query.trim().is_empty() {
            return Err(CatalogError::MissingQuery);
        }

        let url = format!("{}/v1/search", self.config.api_url);
        let limit = self.config.search_limit.to_string();
        debug!(url = %url, query = %query, "Searching catalog");

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[("q", query), ("type", "track"), ("limit", limit.as_str())])
            .send()
            .await?;
        let response = check_status(response).await?;

        let body: SearchResponse = response.json().await.map_err(|e| {
            CatalogError::ParseError(format!("Failed to parse search response: {}", e))
        })?;

        let tracks: Vec<CatalogTrack> = body
            .tracks
            .map(|page| page.items.into_iter().map(normalize).collect())
            .unwrap_or_default();

        debug!(count = tracks.len(), "Catalog search complete");
        Ok(tracks)
    }
}

/// Flatten a raw catalog item into the editor's track shape.
fn normalize(item: TrackObject) -> CatalogTrack {
    let artist = item
        .artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    CatalogTrack {
        id: CatalogTrackId::new(item.id),
        name: item.name,
        artist,
        album_art: item.album.images.into_iter().next().map(|i| i.url),
        album: item.album.name,
        preview_url: item.preview_url,
        uri: item.uri,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AlbumObject, ArtistObject, ImageObject};

    #[test]
    fn normalize_joins_artists_and_takes_first_image() {
        let item = TrackObject {
            id: "t1".to_string(),
            name: "Under Pressure".to_string(),
            artists: vec![
                ArtistObject {
                    name: "Queen".to_string(),
                },
                ArtistObject {
                    name: "David Bowie".to_string(),
                },
            ],
            album: AlbumObject {
                name: "Hot Space".to_string(),
                images: vec![
                    ImageObject {
                        url: "https://img/large".to_string(),
                    },
                    ImageObject {
                        url: "https://img/small".to_string(),
                    },
                ],
            },
            preview_url: None,
            uri: "spotify:track:t1".to_string(),
        };

        let track = normalize(item);
        assert_eq!(track.artist, "Queen, David Bowie");
        assert_eq!(track.album_art.as_deref(), Some("https://img/large"));
        assert_eq!(track.album, "Hot Space");
        assert!(track.preview_url.is_none());
    }

    #[test]
    fn normalize_handles_missing_images() {
        let item = TrackObject {
            id: "t2".to_string(),
            name: "Song".to_string(),
            artists: vec![],
            album: AlbumObject {
                name: "Album".to_string(),
                images: vec![],
            },
            preview_url: Some("https://preview".to_string()),
            uri: String::new(),
        };

        let track = normalize(item);
        assert_eq!(track.artist, "");
        assert!(track.album_art.is_none());
    }
}
