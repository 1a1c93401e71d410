//! Canonical track rows.
//!
//! A catalog track is stored once no matter how many playlists reference it.

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqliteConnection, SqlitePool};
use std::collections::HashMap;
use top100_core::{error::Result, types::*};

pub(crate) fn from_row(row: &SqliteRow) -> Result<Track> {
    Ok(Track {
        id: row.try_get("id")?,
        catalog_id: row.try_get("catalog_id")?,
        name: row.try_get("name")?,
        artist: row.try_get("artist")?,
        album_art: row.try_get("album_art")?,
        preview_url: row.try_get("preview_url")?,
    })
}

/// Insert missing tracks and refresh metadata of existing ones.
///
/// Takes a connection so it can run inside the caller's transaction.
pub async fn upsert_many(conn: &mut SqliteConnection, tracks: &[UpsertTrack]) -> Result<()> {
    let now = Utc::now();

    for track in tracks {
        sqlx::query(
            r#"
            INSERT INTO tracks (id, catalog_id, name, artist, album_art, preview_url, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(catalog_id) DO UPDATE SET
                name = excluded.name,
                artist = excluded.artist,
                album_art = excluded.album_art,
                preview_url = excluded.preview_url,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(TrackId::generate())
        .bind(&track.catalog_id)
        .bind(&track.name)
        .bind(&track.artist)
        .bind(&track.album_art)
        .bind(&track.preview_url)
        .bind(now)
        .bind(now)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Map catalog ids to internal track ids
pub async fn ids_by_catalog_ids(
    conn: &mut SqliteConnection,
    catalog_ids: &[CatalogTrackId],
) -> Result<HashMap<CatalogTrackId, TrackId>> {
    if catalog_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT id, catalog_id FROM tracks WHERE catalog_id IN (");
    let mut separated = builder.separated(", ");
    for id in catalog_ids {
        separated.push_bind(id);
    }
    separated.push_unseparated(")");

    let rows = builder.build().fetch_all(&mut *conn).await?;

    let mut ids = HashMap::with_capacity(rows.len());
    for row in rows {
        ids.insert(row.try_get("catalog_id")?, row.try_get("id")?);
    }
    Ok(ids)
}

pub async fn get_by_id(pool: &SqlitePool, id: &TrackId) -> Result<Option<Track>> {
    let row = sqlx::query(
        "SELECT id, catalog_id, name, artist, album_art, preview_url FROM tracks WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(from_row).transpose()
}

pub async fn get_by_catalog_id(pool: &SqlitePool, catalog_id: &CatalogTrackId) -> Result<Option<Track>> {
    let row = sqlx::query(
        "SELECT id, catalog_id, name, artist, album_art, preview_url FROM tracks WHERE catalog_id = ?",
    )
    .bind(catalog_id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(from_row).transpose()
}
