/// Votes API route
use crate::{api::json_body, error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use top100_core::{CastVote, PlaylistId, TrackId, VoteValue, Voter};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteRequest {
    pub track_id: TrackId,
    pub vote: VoteValue,
    /// Anonymous visitor id
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub playlist_id: PlaylistId,
    pub track_id: TrackId,
    pub vote: VoteValue,
}

/// Signed-in user first, then the visitor id, then the shared anonymous key
fn resolve_voter(auth: Option<&AuthenticatedUser>, session_id: Option<&str>) -> Voter {
    if let Some(auth) = auth {
        return Voter::User(auth.user_id().clone());
    }

    match session_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => Voter::Visitor(id.to_string()),
        None => Voter::Anonymous,
    }
}

/// POST /api/playlists/:playlist_id/votes
/// Record or overwrite the caller's vote on one track
pub async fn cast_vote(
    Path(playlist_id): Path<String>,
    State(app_state): State<AppState>,
    auth: Option<AuthenticatedUser>,
    payload: std::result::Result<Json<CastVoteRequest>, JsonRejection>,
) -> Result<Json<VoteResponse>> {
    let req = json_body(payload)?;
    let voter = resolve_voter(auth.as_ref(), req.session_id.as_deref());

    let vote = app_state
        .db
        .cast_vote(CastVote {
            playlist_id: PlaylistId::new(playlist_id),
            track_id: req.track_id,
            voter,
            value: req.vote,
        })
        .await?;

    tracing::debug!(
        "Vote {} on {}/{} by {}",
        vote.value,
        vote.playlist_id,
        vote.track_id,
        vote.voter.key()
    );

    Ok(Json(VoteResponse {
        playlist_id: vote.playlist_id,
        track_id: vote.track_id,
        vote: vote.value,
    }))
}
