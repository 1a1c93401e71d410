//! Provider configuration and wire types.

use serde::{Deserialize, Serialize};

/// Default Spotify accounts service
pub const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";

/// Default Spotify Web API
pub const DEFAULT_API_URL: &str = "https://api.spotify.com";

/// Results per search request
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// Scopes requested at sign-in
pub const SCOPES: &[&str] = &[
    "user-read-email",
    "playlist-read-private",
    "playlist-modify-public",
    "playlist-modify-private",
];

/// Registered application and provider endpoints.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Where the provider sends the user back after authorizing
    pub redirect_uri: String,
    pub accounts_url: String,
    pub api_url: String,
    pub search_limit: u32,
}

impl CatalogConfig {
    /// Config pointing at the public Spotify endpoints.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            accounts_url: DEFAULT_ACCOUNTS_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    /// Point both services at one base URL (used against mock servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.accounts_url.clone_from(&base_url);
        self.api_url = base_url;
        self
    }
}

/// Provider tokens obtained at sign-in or refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Unix timestamp (seconds) when the access token expires
    pub expires_at: i64,
}

/// Signed-in account as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    pub id: String,
    pub display_name: Option<String>,
    pub image_url: Option<String>,
}

// =============================================================================
// Raw provider responses
// =============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImageObject {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileResponse {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub images: Vec<ImageObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub tracks: Option<TrackPage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrackPage {
    #[serde(default)]
    pub items: Vec<TrackObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArtistObject {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AlbumObject {
    pub name: String,
    #[serde(default)]
    pub images: Vec<ImageObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrackObject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistObject>,
    pub album: AlbumObject,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub uri: String,
}
