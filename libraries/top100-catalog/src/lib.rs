//! Top 100 Catalog
//!
//! HTTP client for the streaming provider (Spotify).
//!
//! # Features
//!
//! - **Sign-in**: authorize URL, code exchange, token refresh, profile
//! - **Search**: track search normalized to [`top100_core::CatalogTrack`]
//!
//! # Example
//!
//! ```ignore
//! use top100_catalog::{CatalogClient, CatalogConfig};
//!
//! let config = CatalogConfig::new("client-id", "client-secret", "http://localhost:8080/api/auth/callback");
//! let catalog = CatalogClient::new(config)?;
//!
//! let tokens = catalog.exchange_code(&code).await?;
//! let tracks = catalog.search_tracks(&tokens.access_token, "bohemian").await?;
//! ```

mod client;
mod error;
mod oauth;
mod search;
mod types;

pub use client::CatalogClient;
pub use error::{CatalogError, Result};
pub use oauth::OAuthClient;
pub use search::SearchClient;
pub use types::{
    CatalogConfig, ProviderProfile, ProviderTokens, DEFAULT_ACCOUNTS_URL, DEFAULT_API_URL,
    DEFAULT_SEARCH_LIMIT, SCOPES,
};
