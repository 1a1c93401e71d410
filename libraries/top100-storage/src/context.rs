use crate::{playlists, users, votes};
use async_trait::async_trait;
use sqlx::SqlitePool;
use top100_core::{error::Result, storage::StorageContext, types::*};

/// Storage context backed by `SQLite`
#[derive(Clone)]
pub struct LocalStorageContext {
    pool: SqlitePool,
}

impl LocalStorageContext {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl StorageContext for LocalStorageContext {
    // Users
    async fn upsert_user(&self, user: UpsertUser) -> Result<User> {
        users::upsert(&self.pool, user).await
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>> {
        users::get_by_id(&self.pool, id).await
    }

    async fn get_all_users(&self) -> Result<Vec<User>> {
        users::get_all(&self.pool).await
    }

    // Playlists
    async fn save_playlist(&self, playlist: SavePlaylist) -> Result<SavedPlaylist> {
        playlists::save(&self.pool, playlist).await
    }

    async fn get_public_playlist(&self, owner_id: &UserId) -> Result<Option<PublicPlaylist>> {
        playlists::get_public(&self.pool, owner_id).await
    }

    // Votes
    async fn cast_vote(&self, vote: CastVote) -> Result<Vote> {
        votes::upsert(&self.pool, vote).await
    }

    async fn get_votes(&self, playlist_id: &PlaylistId) -> Result<Vec<Vote>> {
        votes::get_for_playlist(&self.pool, playlist_id).await
    }
}
