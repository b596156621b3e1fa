//! Account repository

use anyhow::{Result, anyhow};
use sqlx::SqlitePool;

use super::now_iso8601;

/// Account row, password column included for credential checks.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountRecord {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub created: String,
}

pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Look up an account by email
    pub async fn get_by_email(&self, email: &str) -> Result<Option<AccountRecord>> {
        let record = sqlx::query_as::<_, AccountRecord>(
            "SELECT id, email, password, created FROM account WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Owning account of a song, resolved through its artist
    pub async fn get_song_owner_id(&self, song_id: i64) -> Result<i64> {
        let owner: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT a.account_id FROM songs s
            JOIN artists a ON a.id = s.artist_id
            WHERE s.id = ?
            LIMIT 1
            "#,
        )
        .bind(song_id)
        .fetch_optional(&self.pool)
        .await?;

        owner.ok_or_else(|| anyhow!("Song {} not found", song_id))
    }

    /// Create a new account, returning its shape without a re-fetch.
    pub async fn insert(&self, email: &str, password_hash: &str) -> Result<AccountRecord> {
        let result = sqlx::query("INSERT INTO account (email, password) VALUES (?, ?)")
            .bind(email)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        let id = result.last_insert_rowid();
        if id > 0 {
            Ok(AccountRecord {
                id,
                email: email.to_string(),
                password: password_hash.to_string(),
                created: now_iso8601(),
            })
        } else {
            Err(anyhow!("Error inserting account"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::memory_db;

    #[tokio::test]
    async fn song_owner_resolved_through_artist() {
        let db = memory_db().await;
        let account = db.accounts().insert("o@x.com", "hash").await.unwrap();
        let artist = db
            .artists()
            .insert("A", "https://cdn.example.com/a.png", account.id)
            .await
            .unwrap();
        let song = db.songs().insert(artist.id, "S").await.unwrap();

        let owner = db.accounts().get_song_owner_id(song.id).await.unwrap();
        assert_eq!(owner, account.id);

        assert!(db.accounts().get_song_owner_id(9999).await.is_err());
    }

    #[tokio::test]
    async fn lookup_by_email() {
        let db = memory_db().await;
        db.accounts().insert("o@x.com", "hash").await.unwrap();

        let found = db.accounts().get_by_email("o@x.com").await.unwrap();
        assert_eq!(found.unwrap().password, "hash");
        assert!(db.accounts().get_by_email("n@x.com").await.unwrap().is_none());
    }
}
