//! Song provider repository
//!
//! Type 1 providers are well-known integrations visible to every account;
//! type 2 providers are registered devices, visible only to their owner.

use anyhow::Result;
use sqlx::SqlitePool;

use super::devices::DeviceRecord;

pub const WELL_KNOWN_TYPE: i64 = 1;
pub const DEVICE_BACKED_TYPE: i64 = 2;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SongProviderRecord {
    pub id: i64,
    pub name: String,
    #[sqlx(rename = "type")]
    pub kind: i64,
    pub account_id: Option<i64>,
    pub device_id: Option<i64>,
}

const COLUMNS: &str = "id, name, type, account_id, device_id";

pub struct SongProviderRepository {
    pool: SqlitePool,
}

impl SongProviderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Providers visible to an account: well-known rows plus its own,
    /// ascending by id
    pub async fn all(
        &self,
        account_id: i64,
        limit: i64,
        page: i64,
    ) -> Result<Vec<SongProviderRecord>> {
        let records = sqlx::query_as::<_, SongProviderRecord>(&format!(
            r#"
            SELECT {COLUMNS} FROM song_providers
            WHERE type = {WELL_KNOWN_TYPE} OR account_id = ?
            ORDER BY id LIMIT ? OFFSET ?
            "#
        ))
        .bind(account_id)
        .bind(limit)
        .bind(page * limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Register a device as a provider; idempotent on (name, account, device)
    pub async fn insert_device_provider(
        &self,
        account_id: i64,
        device: &DeviceRecord,
    ) -> Result<bool> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO song_providers (name, type, account_id, device_id) VALUES (?, ?, ?, ?)",
        )
        .bind(&device.name)
        .bind(DEVICE_BACKED_TYPE)
        .bind(account_id)
        .bind(device.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Fetch one provider scoped by account
    pub async fn get_by_id(
        &self,
        provider_id: i64,
        account_id: i64,
    ) -> Result<Option<SongProviderRecord>> {
        let record = sqlx::query_as::<_, SongProviderRecord>(&format!(
            "SELECT {COLUMNS} FROM song_providers WHERE id = ? AND account_id = ?"
        ))
        .bind(provider_id)
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}
