/// Playlists API routes
use crate::{
    api::json_body,
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use top100_core::{CatalogTrack, PlaylistId, PublicPlaylist, SavePlaylist, UpsertTrack, UserId};

#[derive(Debug, Deserialize)]
pub struct SavePlaylistRequest {
    pub title: Option<String>,
    pub tracks: Vec<CatalogTrack>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePlaylistResponse {
    pub playlist_id: PlaylistId,
    pub track_count: usize,
}

/// PUT /api/me/playlist
/// Replace the caller's playlist with the submitted order
pub async fn save_my_playlist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    payload: std::result::Result<Json<SavePlaylistRequest>, JsonRejection>,
) -> Result<Json<SavePlaylistResponse>> {
    let req = json_body(payload)?;

    let save = SavePlaylist::new(
        auth.user_id().clone(),
        req.title,
        req.tracks.iter().map(UpsertTrack::from).collect(),
    );
    save.validate()?;

    let saved = app_state.db.save_playlist(save).await.map_err(|e| {
        if e.is_client_error() {
            ServerError::Core(e)
        } else {
            tracing::error!("Failed to save playlist for {}: {}", auth.user_id(), e);
            ServerError::Failed("Failed to save playlist".to_string())
        }
    })?;

    Ok(Json(SavePlaylistResponse {
        playlist_id: saved.playlist.id,
        track_count: saved.track_count,
    }))
}

/// GET /api/me/playlist
/// The caller's own saved playlist
pub async fn get_my_playlist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<PublicPlaylist>> {
    load_playlist(&app_state, auth.user_id()).await
}

/// GET /api/users/:user_id/playlist
/// Read-only view of a user's playlist
pub async fn get_public_playlist(
    Path(user_id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<PublicPlaylist>> {
    load_playlist(&app_state, &UserId::new(user_id)).await
}

async fn load_playlist(app_state: &AppState, owner_id: &UserId) -> Result<Json<PublicPlaylist>> {
    let playlist = app_state
        .db
        .get_public_playlist(owner_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Playlist not found".to_string()))?;

    Ok(Json(playlist))
}
