//! Storage trait for the persistence backend

use crate::error::Result;
use crate::types::{
    CastVote, PlaylistId, PublicPlaylist, SavePlaylist, SavedPlaylist, UpsertUser, User, UserId,
    Vote,
};
use async_trait::async_trait;

/// Storage context providing access to database operations
///
/// Implemented by the SQLite backend; handlers only see this trait's
/// operations so the save and vote contracts stay in one place.
#[async_trait]
pub trait StorageContext: Send + Sync {
    // ========================================================================
    // Users
    // ========================================================================

    /// Create or refresh a user record on sign-in
    async fn upsert_user(&self, user: UpsertUser) -> Result<User>;

    /// Get user by provider account id
    async fn get_user(&self, id: &UserId) -> Result<Option<User>>;

    /// Get all users
    async fn get_all_users(&self) -> Result<Vec<User>>;

    // ========================================================================
    // Playlists
    // ========================================================================

    /// Replace the owner's playlist with the given ordered tracks.
    ///
    /// Upserts the playlist, clears its links, upserts canonical tracks,
    /// maps catalog ids to internal ids and writes one link per entry,
    /// all in one transaction.
    async fn save_playlist(&self, playlist: SavePlaylist) -> Result<SavedPlaylist>;

    /// Load the owner's playlist with tracks ordered by position
    async fn get_public_playlist(&self, owner_id: &UserId) -> Result<Option<PublicPlaylist>>;

    // ========================================================================
    // Votes
    // ========================================================================

    /// Record a vote, overwriting an earlier vote by the same voter
    async fn cast_vote(&self, vote: CastVote) -> Result<Vote>;

    /// All votes recorded on a playlist
    async fn get_votes(&self, playlist_id: &PlaylistId) -> Result<Vec<Vote>>;
}
