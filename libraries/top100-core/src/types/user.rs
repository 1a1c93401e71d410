/// User domain type
use crate::types::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User account, keyed by the provider account id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Provider account id
    pub id: UserId,

    /// Display name reported by the provider
    pub display_name: Option<String>,

    /// Avatar URL
    pub profile_image: Option<String>,

    /// Last sign-in that refreshed this record
    pub updated_at: DateTime<Utc>,
}

/// Data written on every sign-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertUser {
    pub id: UserId,
    pub display_name: Option<String>,
    pub profile_image: Option<String>,
}
