/// Session service - signed session tokens carrying the provider tokens
use crate::error::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use top100_catalog::ProviderTokens;
use top100_core::UserId;

/// Upper bound for configured session lifetimes
const MAX_EXPIRATION_HOURS: u64 = 24 * 365;

#[derive(Debug, Clone)]
pub struct SessionService {
    secret: String,
    expiration: Duration,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: String, // Provider account id
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_at: i64, // Provider token expiry
    pub iat: i64,
    pub exp: i64,
}

/// A verified session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub provider_expires_at: i64,
    pub expires_at: i64,
}

/// A freshly signed session token
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: i64,
}

impl SessionService {
    pub fn new(secret: String, expiration_hours: u64) -> Self {
        Self {
            secret,
            expiration: Duration::hours(
                i64::try_from(expiration_hours.min(MAX_EXPIRATION_HOURS)).unwrap_or(24),
            ),
        }
    }

    /// Sign a session for the user carrying the provider tokens
    pub fn issue(&self, user_id: &UserId, tokens: &ProviderTokens) -> Result<IssuedSession> {
        let now = Utc::now();
        let exp = (now + self.expiration).timestamp();

        let claims = Claims {
            sub: user_id.as_str().to_string(),
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
            expires_at: tokens.expires_at,
            iat: now.timestamp(),
            exp,
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        let token = encode(&Header::default(), &claims, &encoding_key)?;

        Ok(IssuedSession {
            token,
            expires_at: exp,
        })
    }

    /// Verify and decode a session token
    pub fn verify(&self, token: &str) -> Result<Session> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let validation = Validation::default();

        let claims = decode::<Claims>(token, &decoding_key, &validation)?.claims;
        Ok(Session {
            user_id: UserId::new(claims.sub),
            access_token: claims.access_token,
            refresh_token: claims.refresh_token,
            provider_expires_at: claims.expires_at,
            expires_at: claims.exp,
        })
    }
}
