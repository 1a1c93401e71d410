/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use top100_catalog::{CatalogConfig, DEFAULT_ACCOUNTS_URL, DEFAULT_API_URL, DEFAULT_SEARCH_LIMIT};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_auth")]
    pub auth: AuthSettings,

    #[serde(default = "default_catalog")]
    pub catalog: CatalogSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Externally visible base URL, used to derive the sign-in callback
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub session_secret: String,

    #[serde(default = "default_session_expiration_hours")]
    pub session_expiration_hours: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogSettings {
    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,

    /// Empty means `{public_url}/api/auth/callback`
    #[serde(default)]
    pub redirect_uri: String,

    #[serde(default = "default_accounts_url")]
    pub accounts_url: String,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_search_limit")]
    pub search_limit: u32,
}

impl ServerConfig {
    /// Load configuration from file and environment
    ///
    /// Without an explicit path, `config.toml` in the working directory is
    /// used when present. Environment variables override the file, e.g.
    /// `TOP100_AUTH__SESSION_SECRET`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path));
            }
            None => {
                let default_path = Path::new("config.toml");
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("TOP100")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration needed to serve requests
    pub fn validate(&self) -> Result<()> {
        if self.auth.session_secret.is_empty() {
            return Err(ServerError::Config(
                "Session secret is required (set TOP100_AUTH__SESSION_SECRET)".to_string(),
            ));
        }

        if self.catalog.client_id.is_empty() || self.catalog.client_secret.is_empty() {
            return Err(ServerError::Config(
                "Catalog client credentials are required (set TOP100_CATALOG__CLIENT_ID and TOP100_CATALOG__CLIENT_SECRET)"
                    .to_string(),
            ));
        }

        if self.auth.session_expiration_hours == 0 {
            return Err(ServerError::Config(
                "Session expiration must be at least one hour".to_string(),
            ));
        }

        Ok(())
    }

    /// Callback URL registered with the provider
    pub fn redirect_uri(&self) -> String {
        if self.catalog.redirect_uri.is_empty() {
            format!(
                "{}/api/auth/callback",
                self.server.public_url.trim_end_matches('/')
            )
        } else {
            self.catalog.redirect_uri.clone()
        }
    }

    /// Provider settings for the catalog client
    pub fn catalog_config(&self) -> CatalogConfig {
        let mut catalog = CatalogConfig::new(
            self.catalog.client_id.clone(),
            self.catalog.client_secret.clone(),
            self.redirect_uri(),
        );
        catalog.accounts_url.clone_from(&self.catalog.accounts_url);
        catalog.api_url.clone_from(&self.catalog.api_url);
        catalog.search_limit = self.catalog.search_limit;
        catalog
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
        public_url: default_public_url(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_public_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/top100.db".to_string()
}

fn default_auth() -> AuthSettings {
    AuthSettings {
        session_secret: String::new(),
        session_expiration_hours: default_session_expiration_hours(),
    }
}

fn default_session_expiration_hours() -> u64 {
    24
}

fn default_catalog() -> CatalogSettings {
    CatalogSettings {
        client_id: String::new(),
        client_secret: String::new(),
        redirect_uri: String::new(),
        accounts_url: default_accounts_url(),
        api_url: default_api_url(),
        search_limit: default_search_limit(),
    }
}

fn default_accounts_url() -> String {
    DEFAULT_ACCOUNTS_URL.to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_search_limit() -> u32 {
    DEFAULT_SEARCH_LIMIT
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            auth: default_auth(),
            catalog: default_catalog(),
        }
    }
}
