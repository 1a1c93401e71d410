//! Entry point for provider calls.

use crate::error::{CatalogError, Result};
use crate::oauth::OAuthClient;
use crate::search::SearchClient;
use crate::types::{CatalogConfig, ProviderProfile, ProviderTokens};
use reqwest::Client;
use std::time::Duration;
use top100_core::types::CatalogTrack;
use url::Url;

/// Client for the streaming provider's accounts service and catalog.
///
/// Holds no user state; every call takes the user's provider token.
#[derive(Clone)]
pub struct CatalogClient {
    http: Client,
    config: CatalogConfig,
}

impl CatalogClient {
    /// Create a client, validating and normalizing the configured URLs.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let config = CatalogConfig {
            accounts_url: normalize_url(&config.accounts_url)?,
            api_url: normalize_url(&config.api_url)?,
            ..config
        };

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Top100/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn oauth(&self) -> OAuthClient<'_> {
        OAuthClient::new(&self.http, &self.config)
    }

    pub fn search(&self) -> SearchClient<'_> {
        SearchClient::new(&self.http, &self.config)
    }

    pub fn authorize_url(&self, state: &str) -> Result<Url> {
        self.oauth().authorize_url(state)
    }

    pub async fn exchange_code(&self, code: &str) -> Result<ProviderTokens> {
        self.oauth().exchange_code(code).await
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<ProviderTokens> {
        self.oauth().refresh(refresh_token).await
    }

    pub async fn current_profile(&self, access_token: &str) -> Result<ProviderProfile> {
        self.oauth().current_profile(access_token).await
    }

    pub async fn search_tracks(&self, access_token: &str, query: &str) -> Result<Vec<CatalogTrack>> {
        self.search().tracks(access_token, query).await
    }
}

fn normalize_url(raw: &str) -> Result<String> {
    if raw.is_empty() {
        return Err(CatalogError::InvalidUrl("URL cannot be empty".into()));
    }
    let url = raw.trim_end_matches('/').to_string();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(CatalogError::InvalidUrl(
            "URL must start with http:// or https://".into(),
        ));
    }
    Url::parse(&url).map_err(|e| CatalogError::InvalidUrl(e.to_string()))?;
    Ok(url)
}
