//! Radio repository

use anyhow::{Result, anyhow};
use sqlx::SqlitePool;

use super::now_iso8601;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RadioRecord {
    pub id: i64,
    pub name: String,
    pub avatar: Option<String>,
    pub stream_url: String,
    pub created: String,
}

const COLUMNS: &str = "id, name, avatar, stream_url, created";

pub struct RadioRepository {
    pool: SqlitePool,
}

impl RadioRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all radios of an account, newest first
    pub async fn all(&self, account_id: i64, limit: i64, page: i64) -> Result<Vec<RadioRecord>> {
        let records = sqlx::query_as::<_, RadioRecord>(&format!(
            "SELECT {COLUMNS} FROM radios WHERE account_id = ? ORDER BY id DESC LIMIT ? OFFSET ?"
        ))
        .bind(account_id)
        .bind(limit)
        .bind(page * limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Create a new radio
    pub async fn insert(
        &self,
        account_id: i64,
        name: &str,
        stream_url: &str,
        avatar: &str,
    ) -> Result<RadioRecord> {
        let result = sqlx::query(
            "INSERT INTO radios (name, stream_url, avatar, account_id) VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(stream_url)
        .bind(avatar)
        .bind(account_id)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        if id > 0 {
            Ok(RadioRecord {
                id,
                name: name.to_string(),
                avatar: Some(avatar.to_string()),
                stream_url: stream_url.to_string(),
                created: now_iso8601(),
            })
        } else {
            Err(anyhow!("Error inserting radio"))
        }
    }

    /// Update a radio; false when no owned row matched
    pub async fn update(
        &self,
        radio_id: i64,
        account_id: i64,
        name: &str,
        stream_url: &str,
        avatar: &str,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE radios SET name = ?, stream_url = ?, avatar = ? WHERE id = ? AND account_id = ?",
        )
        .bind(name)
        .bind(stream_url)
        .bind(avatar)
        .bind(radio_id)
        .bind(account_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a radio; false when no owned row matched
    pub async fn delete(&self, radio_id: i64, account_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM radios WHERE id = ? AND account_id = ?")
            .bind(radio_id)
            .bind(account_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
