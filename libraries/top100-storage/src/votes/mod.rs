//! Agree/disagree votes on playlist tracks

use crate::playlists;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use top100_core::{error::Result, types::*, Top100Error};
use uuid::Uuid;

fn from_row(row: &SqliteRow) -> Result<Vote> {
    let voter_key: String = row.try_get("voter_key")?;
    let value: String = row.try_get("vote")?;

    Ok(Vote {
        playlist_id: row.try_get("playlist_id")?,
        track_id: row.try_get("track_id")?,
        voter: Voter::from_key(&voter_key)
            .ok_or_else(|| Top100Error::storage(format!("Invalid voter key: {}", voter_key)))?,
        value: value.parse()?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Record a vote, replacing any earlier vote by the same voter on the same track
pub async fn upsert(pool: &SqlitePool, vote: CastVote) -> Result<Vote> {
    if playlists::get_by_id(pool, &vote.playlist_id).await?.is_none() {
        return Err(Top100Error::UnknownPlaylist(vote.playlist_id));
    }
    // Votes only apply to tracks the playlist actually lists
    let listed: Option<i64> = sqlx::query_scalar(
        "SELECT 1 FROM playlist_tracks WHERE playlist_id = ? AND track_id = ?",
    )
    .bind(&vote.playlist_id)
    .bind(&vote.track_id)
    .fetch_optional(pool)
    .await?;
    if listed.is_none() {
        return Err(Top100Error::TrackNotFound(vote.track_id));
    }

    let now = Utc::now();
    let voter_key = vote.voter.key();

    let row = sqlx::query(
        r#"
        INSERT INTO votes (id, playlist_id, track_id, voter_key, reviewer_id, vote, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(playlist_id, track_id, voter_key) DO UPDATE SET
            vote = excluded.vote,
            updated_at = excluded.updated_at
        RETURNING playlist_id, track_id, voter_key, vote, updated_at
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&vote.playlist_id)
    .bind(&vote.track_id)
    .bind(&voter_key)
    .bind(vote.voter.user_id())
    .bind(vote.value.as_str())
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    tracing::debug!(
        playlist_id = %vote.playlist_id,
        track_id = %vote.track_id,
        voter = %voter_key,
        vote = %vote.value,
        "Vote recorded"
    );

    from_row(&row)
}

/// All votes on a playlist, oldest first
pub async fn get_for_playlist(pool: &SqlitePool, playlist_id: &PlaylistId) -> Result<Vec<Vote>> {
    let rows = sqlx::query(
        r#"
        SELECT playlist_id, track_id, voter_key, vote, updated_at
        FROM votes
        WHERE playlist_id = ?
        ORDER BY created_at
        "#,
    )
    .bind(playlist_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(from_row).collect()
}
