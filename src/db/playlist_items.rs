//! Playlist item repository
//!
//! An item references exactly one of a song or a radio; the listing joins
//! both sides and reconstructs whichever one is set.

use anyhow::Result;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use super::radios::RadioRecord;
use super::songs::SongRecord;

#[derive(Debug, Clone)]
pub struct PlaylistItemRecord {
    pub id: i64,
    pub song_id: Option<i64>,
    pub radio_id: Option<i64>,
    pub created: String,
    pub song: Option<SongRecord>,
    pub radio: Option<RadioRecord>,
}

pub struct PlaylistItemRepository {
    pool: SqlitePool,
}

impl PlaylistItemRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All items of a playlist, newest first, with the referenced song or
    /// radio inlined
    pub async fn list(
        &self,
        playlist_id: i64,
        limit: i64,
        page: i64,
    ) -> Result<Vec<PlaylistItemRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT i.id AS item_id, i.created AS item_created, i.song_id, i.radio_id,
                   s.name AS song_name, s.played AS song_played,
                   s.duration AS song_duration, s.created AS song_created,
                   r.name AS radio_name, r.stream_url AS radio_stream_url,
                   r.avatar AS radio_avatar, r.created AS radio_created
            FROM playlist_items i
            LEFT JOIN radios r ON r.id = i.radio_id
            LEFT JOIN songs s ON s.id = i.song_id
            WHERE i.playlist_id = ?
            ORDER BY i.id DESC LIMIT ? OFFSET ?
            "#,
        )
        .bind(playlist_id)
        .bind(limit)
        .bind(page * limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_item_row).collect()
    }

    /// Add a song to a playlist
    pub async fn insert_song(&self, playlist_id: i64, song_id: i64) -> Result<bool> {
        let result =
            sqlx::query("INSERT INTO playlist_items (playlist_id, song_id) VALUES (?, ?)")
                .bind(playlist_id)
                .bind(song_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove an item by id; false when no row matched
    pub async fn remove(&self, item_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM playlist_items WHERE id = ?")
            .bind(item_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn map_item_row(row: &SqliteRow) -> Result<PlaylistItemRecord> {
    let song_id: Option<i64> = row.try_get("song_id")?;
    let radio_id: Option<i64> = row.try_get("radio_id")?;

    let song = match song_id {
        Some(id) => Some(SongRecord {
            id,
            name: row.try_get("song_name")?,
            played: row.try_get("song_played")?,
            duration: row.try_get("song_duration")?,
            created: row.try_get("song_created")?,
        }),
        None => None,
    };

    let radio = match (song_id, radio_id) {
        (None, Some(id)) => Some(RadioRecord {
            id,
            name: row.try_get("radio_name")?,
            avatar: row.try_get("radio_avatar")?,
            stream_url: row.try_get("radio_stream_url")?,
            created: row.try_get("radio_created")?,
        }),
        _ => None,
    };

    Ok(PlaylistItemRecord {
        id: row.try_get("item_id")?,
        song_id,
        radio_id,
        created: row.try_get("item_created")?,
        song,
        radio,
    })
}
