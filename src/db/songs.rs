//! Song repository
//!
//! Songs belong to an artist; account scoping always joins through `artists`.

use anyhow::{Result, anyhow};
use sqlx::SqlitePool;

use super::now_iso8601;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SongRecord {
    pub id: i64,
    pub name: String,
    pub played: i64,
    pub duration: i64,
    pub created: String,
}

const COLUMNS: &str = "s.id, s.name, s.played, s.duration, s.created";

pub struct SongRepository {
    pool: SqlitePool,
}

impl SongRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all songs of an account, newest first
    pub async fn all(&self, account_id: i64, limit: i64, page: i64) -> Result<Vec<SongRecord>> {
        let records = sqlx::query_as::<_, SongRecord>(&format!(
            r#"
            SELECT {COLUMNS} FROM songs s
            JOIN artists a ON a.id = s.artist_id
            WHERE a.account_id = ?
            ORDER BY s.id DESC LIMIT ? OFFSET ?
            "#
        ))
        .bind(account_id)
        .bind(limit)
        .bind(page * limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// List songs of one artist
    pub async fn list_by_artist(
        &self,
        artist_id: i64,
        limit: i64,
        page: i64,
    ) -> Result<Vec<SongRecord>> {
        let records = sqlx::query_as::<_, SongRecord>(
            "SELECT id, name, played, duration, created FROM songs WHERE artist_id = ? ORDER BY id DESC LIMIT ? OFFSET ?",
        )
        .bind(artist_id)
        .bind(limit)
        .bind(page * limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Paginate account songs by name
    pub async fn search_by_name(
        &self,
        name: &str,
        account_id: i64,
        limit: i64,
        page: i64,
    ) -> Result<Vec<SongRecord>> {
        let records = sqlx::query_as::<_, SongRecord>(&format!(
            r#"
            SELECT {COLUMNS} FROM songs s
            INNER JOIN artists a ON s.artist_id = a.id
            WHERE s.name LIKE '%' || ? || '%' AND a.account_id = ?
            ORDER BY s.id DESC LIMIT ? OFFSET ?
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

    /// Account songs tagged with a genre
    pub async fn list_by_genre(
        &self,
        genre_id: i64,
        account_id: i64,
        limit: i64,
        page: i64,
    ) -> Result<Vec<SongRecord>> {
        let records = sqlx::query_as::<_, SongRecord>(&format!(
            r#"
            SELECT {COLUMNS} FROM song_genre sg
            JOIN songs s ON s.id = sg.song_id
            JOIN artists a ON a.id = s.artist_id
            WHERE sg.genre_id = ? AND a.account_id = ?
            ORDER BY s.id DESC LIMIT ? OFFSET ?
            "#
        ))
        .bind(genre_id)
        .bind(account_id)
        .bind(limit)
        .bind(page * limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Fetch one song scoped by account; 0 or 1 rows
    pub async fn get_by_id(&self, song_id: i64, account_id: i64) -> Result<Vec<SongRecord>> {
        let records = sqlx::query_as::<_, SongRecord>(&format!(
            r#"
            SELECT {COLUMNS} FROM songs s
            JOIN artists a ON a.id = s.artist_id
            WHERE s.id = ? AND a.account_id = ?
            "#
        ))
        .bind(song_id)
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Create a new song
    pub async fn insert(&self, artist_id: i64, name: &str) -> Result<SongRecord> {
        let result = sqlx::query("INSERT INTO songs (name, artist_id) VALUES (?, ?)")
            .bind(name)
            .bind(artist_id)
            .execute(&self.pool)
            .await?;

        let id = result.last_insert_rowid();
        if id > 0 {
            Ok(SongRecord {
                id,
                name: name.to_string(),
                played: 0,
                duration: 0,
                created: now_iso8601(),
            })
        } else {
            Err(anyhow!("Error inserting song"))
        }
    }

    /// Rename a song
    pub async fn update_name(&self, song_id: i64, name: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE songs SET name = ? WHERE id = ?")
            .bind(name)
            .bind(song_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a song
    pub async fn delete(&self, song_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM songs WHERE id = ?")
            .bind(song_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Increment the play counter by one
    pub async fn increment_played(&self, song_id: i64) -> Result<bool> {
        let result = sqlx::query("UPDATE songs SET played = played + 1 WHERE id = ?")
            .bind(song_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Set song duration in seconds
    pub async fn set_duration(&self, song_id: i64, duration: i64) -> Result<bool> {
        let result = sqlx::query("UPDATE songs SET duration = ? WHERE id = ?")
            .bind(duration)
            .bind(song_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::memory_db;

    #[tokio::test]
    async fn counters_and_duration() {
        let db = memory_db().await;
        let account = db.accounts().insert("o@x.com", "hash").await.unwrap();
        let artist = db
            .artists()
            .insert("A", "https://cdn.example.com/a.png", account.id)
            .await
            .unwrap();
        let song = db.songs().insert(artist.id, "S").await.unwrap();

        assert!(db.songs().increment_played(song.id).await.unwrap());
        assert!(db.songs().increment_played(song.id).await.unwrap());
        assert!(db.songs().set_duration(song.id, 215).await.unwrap());

        let rows = db.songs().get_by_id(song.id, account.id).await.unwrap();
        assert_eq!(rows[0].played, 2);
        assert_eq!(rows[0].duration, 215);

        // zero-row updates report false, not an error
        assert!(!db.songs().set_duration(9999, 10).await.unwrap());
    }
}
