//! Artist repository

use anyhow::{Result, anyhow};
use sqlx::SqlitePool;

use super::now_iso8601;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ArtistRecord {
    pub id: i64,
    pub name: String,
    pub avatar: Option<String>,
    pub created: String,
}

const COLUMNS: &str = "id, name, avatar, created";

pub struct ArtistRepository {
    pool: SqlitePool,
}

impl ArtistRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all artists of an account, newest first
    pub async fn all(&self, account_id: i64, limit: i64, page: i64) -> Result<Vec<ArtistRecord>> {
        let records = sqlx::query_as::<_, ArtistRecord>(&format!(
            "SELECT {COLUMNS} FROM artists WHERE account_id = ? ORDER BY id DESC LIMIT ? OFFSET ?"
        ))
        .bind(account_id)
        .bind(limit)
        .bind(page * limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Fetch one artist scoped by account; 0 or 1 rows
    pub async fn get_by_id(&self, artist_id: i64, account_id: i64) -> Result<Vec<ArtistRecord>> {
        let records = sqlx::query_as::<_, ArtistRecord>(&format!(
            "SELECT {COLUMNS} FROM artists WHERE id = ? AND account_id = ? LIMIT 1"
        ))
        .bind(artist_id)
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Paginate artists by name
    pub async fn search_by_name(
        &self,
        name: &str,
        account_id: i64,
        limit: i64,
        page: i64,
    ) -> Result<Vec<ArtistRecord>> {
        let records = sqlx::query_as::<_, ArtistRecord>(&format!(
            r#"
            SELECT {COLUMNS} FROM artists
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

    /// Artist owning a song, scoped by account
    pub async fn get_by_song_id(
        &self,
        song_id: i64,
        account_id: i64,
    ) -> Result<Option<ArtistRecord>> {
        let record = sqlx::query_as::<_, ArtistRecord>(
            r#"
            SELECT a.id, a.name, a.avatar, a.created FROM songs s
            JOIN artists a ON s.artist_id = a.id
            WHERE s.id = ? AND a.account_id = ?
            "#,
        )
        .bind(song_id)
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Artist owning a song, no account check. Only for nested resolution
    /// under an already-authorized parent.
    pub async fn get_by_song_id_unchecked(&self, song_id: i64) -> Result<Option<ArtistRecord>> {
        let record = sqlx::query_as::<_, ArtistRecord>(
            r#"
            SELECT a.id, a.name, a.avatar, a.created FROM songs s
            JOIN artists a ON s.artist_id = a.id
            WHERE s.id = ?
            "#,
        )
        .bind(song_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Create a new artist
    pub async fn insert(&self, name: &str, avatar: &str, account_id: i64) -> Result<ArtistRecord> {
        let result = sqlx::query("INSERT INTO artists (avatar, name, account_id) VALUES (?, ?, ?)")
            .bind(avatar)
            .bind(name)
            .bind(account_id)
            .execute(&self.pool)
            .await?;

        let id = result.last_insert_rowid();
        if id > 0 {
            Ok(ArtistRecord {
                id,
                name: name.to_string(),
                avatar: Some(avatar.to_string()),
                created: now_iso8601(),
            })
        } else {
            Err(anyhow!("Error inserting artist"))
        }
    }

    /// Update an artist; false when no owned row matched
    pub async fn update(
        &self,
        artist_id: i64,
        name: &str,
        avatar: &str,
        account_id: i64,
    ) -> Result<bool> {
        let result =
            sqlx::query("UPDATE artists SET name = ?, avatar = ? WHERE id = ? AND account_id = ?")
                .bind(name)
                .bind(avatar)
                .bind(artist_id)
                .bind(account_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete an artist; false when no owned row matched
    pub async fn delete(&self, artist_id: i64, account_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM artists WHERE id = ? AND account_id = ?")
            .bind(artist_id)
            .bind(account_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
