/// Core error types for Top 100
use crate::types::{CatalogTrackId, PlaylistId, TrackId, UserId};
use thiserror::Error;

/// Result type alias using `Top100Error`
pub type Result<T> = std::result::Result<T, Top100Error>;

/// Core error type for Top 100
#[derive(Error, Debug)]
pub enum Top100Error {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// No playlist saved for this owner
    #[error("No playlist for user: {0}")]
    PlaylistNotFound(UserId),

    /// Playlist id does not exist
    #[error("Playlist not found: {0}")]
    UnknownPlaylist(PlaylistId),

    /// Track not found
    #[error("Track not found: {0}")]
    TrackNotFound(TrackId),

    /// Playlist would exceed the track limit
    #[error("Playlist is limited to {limit} tracks")]
    PlaylistFull { limit: usize },

    /// The same catalog track appears twice in one playlist
    #[error("Duplicate track in playlist: {0}")]
    DuplicateTrack(CatalogTrackId),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Browser-local store could not be read or written
    #[error("Local store error: {0}")]
    LocalStore(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Database errors (for storage implementations)
    #[error("Database error: {0}")]
    Database(String),
}

impl Top100Error {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a local store error
    pub fn local_store(msg: impl Into<String>) -> Self {
        Self::LocalStore(msg.into())
    }

    /// Whether the error is caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::PlaylistFull { .. } | Self::DuplicateTrack(_) | Self::InvalidInput(_)
        )
    }

    /// Whether the error means the addressed entity does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::PlaylistNotFound(_)
                | Self::UnknownPlaylist(_)
                | Self::TrackNotFound(_)
        )
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for Top100Error {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}
