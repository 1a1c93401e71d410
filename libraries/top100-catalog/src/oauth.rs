//! Authorization-code sign-in against the provider's accounts service.

use crate::error::{CatalogError, Result};
use crate::types::{
    CatalogConfig, ProfileResponse, ProviderProfile, ProviderTokens, TokenResponse, SCOPES,
};
use reqwest::{Client, Response};
use tracing::{debug, info, warn};
use url::Url;

/// Sign-in client for the provider's accounts service.
pub struct OAuthClient<'a> {
    http: &'a Client,
    config: &'a CatalogConfig,
}

impl<'a> OAuthClient<'a> {
    pub(crate) fn new(http: &'a Client, config: &'a CatalogConfig) -> Self {
        Self { http, config }
    }

    /// URL the user is redirected to for consent.
    pub fn authorize_url(&self, state: &str) -> Result<Url> {
        let scope = SCOPES.join(" ");
        Url::parse_with_params(
            &format!("{}/authorize", self.config.accounts_url),
            &[
                ("client_id", self.config.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("scope", scope.as_str()),
                ("state", state),
            ],
        )
        .map_err(|e| CatalogError::InvalidUrl(e.to_string()))
    }

    /// Trade an authorization code for provider tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<ProviderTokens> {
        debug!("Exchanging authorization code");
        let tokens = self
            .request_token(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ])
            .await?;
        info!("Authorization code exchanged");
        Ok(tokens)
    }

    /// Obtain a new access token.
    ///
    /// The provider may omit a new refresh token, in which case the one
    /// passed in is kept.
    pub async fn refresh(&self, refresh_token: &str) -> Result<ProviderTokens> {
        debug!("Refreshing provider access token");
        let mut tokens = self
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .await?;

        if tokens.refresh_token.is_none() {
            tokens.refresh_token = Some(refresh_token.to_string());
        }
        Ok(tokens)
    }

    /// Profile of the account that owns `access_token`.
    pub async fn current_profile(&self, access_token: &str) -> Result<ProviderProfile> {
        let url = format!("{}/v1/me", self.config.api_url);
        debug!(url = %url, "Fetching provider profile");

        let response = self.http.get(&url).bearer_auth(access_token).send().await?;
        let response = check_status(response).await?;

        let profile: ProfileResponse = response.json().await.map_err(|e| {
            CatalogError::ParseError(format!("Failed to parse profile response: {}", e))
        })?;

        Ok(ProviderProfile {
            id: profile.id,
            display_name: profile.display_name,
            image_url: profile.images.into_iter().next().map(|i| i.url),
        })
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<ProviderTokens> {
        let url = format!("{}/api/token", self.config.accounts_url);

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 400 || status.as_u16() == 401 {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Token request rejected");
            return Err(CatalogError::Unauthorized(error_text));
        }
        let response = check_status(response).await?;

        let token: TokenResponse = response.json().await.map_err(|e| {
            CatalogError::ParseError(format!("Failed to parse token response: {}", e))
        })?;

        Ok(ProviderTokens {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: chrono::Utc::now().timestamp() + token.expires_in,
        })
    }
}

/// Map non-success statuses to errors; 401 means the token was rejected.
pub(crate) async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response.text().await.unwrap_or_default();
    if status.as_u16() == 401 {
        warn!(error = %error_text, "Provider rejected access token");
        Err(CatalogError::Unauthorized(error_text))
    } else {
        warn!(status = %status, error = %error_text, "Provider request failed");
        Err(CatalogError::Upstream {
            status: status.as_u16(),
            message: error_text,
        })
    }
}
