//! Genre repository

use anyhow::Result;
use sqlx::SqlitePool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GenreRecord {
    pub id: i64,
    pub name: String,
}

pub struct GenreRepository {
    pool: SqlitePool,
}

impl GenreRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all genres
    pub async fn all(&self, limit: i64, page: i64) -> Result<Vec<GenreRecord>> {
        let records = sqlx::query_as::<_, GenreRecord>(
            "SELECT id, name FROM genres ORDER BY id DESC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(page * limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
