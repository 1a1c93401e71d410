//! User records, keyed by streaming-provider account id

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use top100_core::{error::Result, types::*};

fn from_row(row: &SqliteRow) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        display_name: row.try_get("display_name")?,
        profile_image: row.try_get("profile_image")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Create the user or refresh its display name and image
pub async fn upsert(pool: &SqlitePool, user: UpsertUser) -> Result<User> {
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO users (id, display_name, profile_image, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            display_name = excluded.display_name,
            profile_image = excluded.profile_image,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(&user.id)
    .bind(&user.display_name)
    .bind(&user.profile_image)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    get_by_id(pool, &user.id)
        .await?
        .ok_or_else(|| top100_core::Top100Error::storage("Failed to retrieve upserted user"))
}

pub async fn get_by_id(pool: &SqlitePool, id: &UserId) -> Result<Option<User>> {
    let row = sqlx::query(
        "SELECT id, display_name, profile_image, updated_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(from_row).transpose()
}

/// Get all users, most recently active first
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query(
        "SELECT id, display_name, profile_image, updated_at FROM users ORDER BY updated_at DESC",
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(from_row).collect()
}
