//! One ranked playlist per owner

use crate::tracks;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use top100_core::{error::Result, types::*, Top100Error};

/// Replace the owner's playlist.
///
/// Steps, in one transaction:
/// 1. upsert the playlist row (one per owner)
/// 2. delete its existing links
/// 3. upsert canonical tracks
/// 4. map catalog ids to internal ids
/// 5. insert one link per entry, position = index
///
/// Any failure rolls the whole save back.
pub async fn save(pool: &SqlitePool, save: SavePlaylist) -> Result<SavedPlaylist> {
    save.validate()?;

    let now = Utc::now();
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO playlists (id, owner_id, title, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(owner_id) DO UPDATE SET
            title = excluded.title,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(PlaylistId::generate())
    .bind(&save.owner_id)
    .bind(&save.title)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let row = sqlx::query("SELECT id, owner_id, title, updated_at FROM playlists WHERE owner_id = ?")
        .bind(&save.owner_id)
        .fetch_one(&mut *tx)
        .await?;

    let playlist = Playlist {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        title: row.try_get("title")?,
        updated_at: row.try_get("updated_at")?,
    };

    sqlx::query("DELETE FROM playlist_tracks WHERE playlist_id = ?")
        .bind(&playlist.id)
        .execute(&mut *tx)
        .await?;

    tracks::upsert_many(&mut *tx, &save.tracks).await?;

    let catalog_ids: Vec<CatalogTrackId> =
        save.tracks.iter().map(|t| t.catalog_id.clone()).collect();
    let track_ids = tracks::ids_by_catalog_ids(&mut *tx, &catalog_ids).await?;

    for (position, catalog_id) in catalog_ids.iter().enumerate() {
        let track_id = track_ids.get(catalog_id).ok_or_else(|| {
            Top100Error::storage(format!("Track {} missing after upsert", catalog_id))
        })?;

        sqlx::query("INSERT INTO playlist_tracks (playlist_id, track_id, position) VALUES (?, ?, ?)")
            .bind(&playlist.id)
            .bind(track_id)
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    tracing::info!(
        playlist_id = %playlist.id,
        owner_id = %playlist.owner_id,
        tracks = catalog_ids.len(),
        "Playlist saved"
    );

    Ok(SavedPlaylist {
        playlist,
        track_count: catalog_ids.len(),
    })
}

/// Load the owner's playlist with owner profile and ordered tracks
pub async fn get_public(pool: &SqlitePool, owner_id: &UserId) -> Result<Option<PublicPlaylist>> {
    let row = sqlx::query(
        r#"
        SELECT p.id, p.owner_id, p.title, p.updated_at,
               u.display_name, u.profile_image
        FROM playlists p
        INNER JOIN users u ON p.owner_id = u.id
        WHERE p.owner_id = ?
        "#,
    )
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let playlist = PlaylistSummary {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        owner_id: row.try_get("owner_id")?,
        updated_at: row.try_get("updated_at")?,
        owner: PlaylistOwner {
            display_name: row.try_get("display_name")?,
            profile_image: row.try_get("profile_image")?,
        },
    };

    let track_rows = sqlx::query(
        r#"
        SELECT pt.position,
               t.id, t.catalog_id, t.name, t.artist, t.album_art, t.preview_url
        FROM playlist_tracks pt
        INNER JOIN tracks t ON pt.track_id = t.id
        WHERE pt.playlist_id = ?
        ORDER BY pt.position
        "#,
    )
    .bind(&playlist.id)
    .fetch_all(pool)
    .await?;

    let tracks = track_rows
        .iter()
        .map(|row| -> Result<PlaylistEntry> {
            Ok(PlaylistEntry {
                position: row.try_get::<i64, _>("position")? as u32,
                track: tracks::from_row(row)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Some(PublicPlaylist { playlist, tracks }))
}

/// Playlist row by id, without tracks
pub async fn get_by_id(pool: &SqlitePool, id: &PlaylistId) -> Result<Option<Playlist>> {
    let row = sqlx::query("SELECT id, owner_id, title, updated_at FROM playlists WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(|row| -> Result<Playlist> {
        Ok(Playlist {
            id: row.try_get("id")?,
            owner_id: row.try_get("owner_id")?,
            title: row.try_get("title")?,
            updated_at: row.try_get("updated_at")?,
        })
    })
    .transpose()
}
