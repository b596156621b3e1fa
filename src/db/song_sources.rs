//! Song source repository
//!
//! A source ties a song to a provider-specific reference. Rows are inserted
//! once resolved and never updated in place.

use anyhow::Result;
use sqlx::SqlitePool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SongSourceRecord {
    pub song_id: i64,
    pub provider_id: i64,
    pub source_id: String,
    pub source_uri: String,
}

pub struct SongSourceRepository {
    pool: SqlitePool,
}

impl SongSourceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new source for a song
    pub async fn insert(
        &self,
        provider_id: i64,
        song_id: i64,
        source_id: &str,
        source_uri: &str,
    ) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO song_source (song_id, source_uri, provider_id, source_id) VALUES (?, ?, ?, ?)",
        )
        .bind(song_id)
        .bind(source_uri)
        .bind(provider_id)
        .bind(source_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Sources of a song, scoped by account through the owning artist
    pub async fn list_for_song(
        &self,
        song_id: i64,
        account_id: i64,
    ) -> Result<Vec<SongSourceRecord>> {
        let records = sqlx::query_as::<_, SongSourceRecord>(
            r#"
            SELECT ss.song_id, ss.provider_id, ss.source_id, ss.source_uri
            FROM song_source ss
            JOIN songs s ON ss.song_id = s.id
            JOIN artists a ON a.id = s.artist_id
            WHERE ss.song_id = ? AND a.account_id = ?
            "#,
        )
        .bind(song_id)
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Sources of a song, no account check. Only for nested resolution
    /// under an already-authorized parent.
    pub async fn list_for_song_unchecked(&self, song_id: i64) -> Result<Vec<SongSourceRecord>> {
        let records = sqlx::query_as::<_, SongSourceRecord>(
            "SELECT song_id, provider_id, source_id, source_uri FROM song_source WHERE song_id = ?",
        )
        .bind(song_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
