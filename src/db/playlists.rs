//! Playlist repository

use anyhow::{Result, anyhow};
use sqlx::SqlitePool;

use super::now_iso8601;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlaylistRecord {
    pub id: i64,
    pub name: String,
    pub avatar: Option<String>,
    pub played: i64,
    pub created: String,
}

const COLUMNS: &str = "id, name, avatar, played, created";

pub struct PlaylistRepository {
    pool: SqlitePool,
}

impl PlaylistRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all playlists of an account, newest first
    pub async fn all(&self, account_id: i64, limit: i64, page: i64) -> Result<Vec<PlaylistRecord>> {
        let records = sqlx::query_as::<_, PlaylistRecord>(&format!(
            "SELECT {COLUMNS} FROM playlists WHERE account_id = ? ORDER BY id DESC LIMIT ? OFFSET ?"
        ))
        .bind(account_id)
        .bind(limit)
        .bind(page * limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Fetch one playlist scoped by account; 0 or 1 rows
    pub async fn get_by_id(&self, playlist_id: i64, account_id: i64) -> Result<Vec<PlaylistRecord>> {
        let records = sqlx::query_as::<_, PlaylistRecord>(&format!(
            "SELECT {COLUMNS} FROM playlists WHERE id = ? AND account_id = ? LIMIT 1"
        ))
        .bind(playlist_id)
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Playlist containing an item, scoped by account; 0 or 1 rows
    pub async fn get_containing_item(
        &self,
        item_id: i64,
        account_id: i64,
    ) -> Result<Vec<PlaylistRecord>> {
        let records = sqlx::query_as::<_, PlaylistRecord>(
            r#"
            SELECT p.id, p.name, p.avatar, p.played, p.created FROM playlists p
            JOIN playlist_items pi ON p.id = pi.playlist_id
            WHERE pi.id = ? AND p.account_id = ?
            LIMIT 1
            "#,
        )
        .bind(item_id)
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Paginate playlists by name
    pub async fn search_by_name(
        &self,
        name: &str,
        account_id: i64,
        limit: i64,
        page: i64,
    ) -> Result<Vec<PlaylistRecord>> {
        let records = sqlx::query_as::<_, PlaylistRecord>(&format!(
            r#"
            SELECT {COLUMNS} FROM playlists
            WHERE name LIKE '%' || ? || '%' AND account_id = ?
            ORDER BY id DESC LIMIT ? OFFSET ?
            "#
        ))
        .bind(name)
        .bind(account_id)
        .bind(limit)
        .bind(page * limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Create a new playlist
    pub async fn insert(
        &self,
        name: &str,
        avatar: &str,
        account_id: i64,
    ) -> Result<PlaylistRecord> {
        let result =
            sqlx::query("INSERT INTO playlists (name, avatar, account_id) VALUES (?, ?, ?)")
                .bind(name)
                .bind(avatar)
                .bind(account_id)
                .execute(&self.pool)
                .await?;

        let id = result.last_insert_rowid();
        if id > 0 {
            Ok(PlaylistRecord {
                id,
                name: name.to_string(),
                avatar: Some(avatar.to_string()),
                played: 0,
                created: now_iso8601(),
            })
        } else {
            Err(anyhow!("Error inserting new playlist"))
        }
    }

    /// Update a playlist; false when no owned row matched
    pub async fn update(
        &self,
        playlist_id: i64,
        account_id: i64,
        name: &str,
        avatar: &str,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE playlists SET name = ?, avatar = ? WHERE id = ? AND account_id = ?",
        )
        .bind(name)
        .bind(avatar)
        .bind(playlist_id)
        .bind(account_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a playlist; false when no owned row matched
    pub async fn delete(&self, playlist_id: i64, account_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM playlists WHERE id = ? AND account_id = ?")
            .bind(playlist_id)
            .bind(account_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
