//! Device repository
//!
//! Devices are unique per (name, account); creation is get-or-insert.

use anyhow::{Result, anyhow};
use sqlx::SqlitePool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DeviceRecord {
    pub id: i64,
    pub name: String,
    pub is_online: bool,
    pub is_playing: bool,
    pub created: String,
}

const COLUMNS: &str = "id, name, is_online, is_playing, created";

pub struct DeviceRepository {
    pool: SqlitePool,
}

impl DeviceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all devices of an account, newest first
    pub async fn all(&self, account_id: i64, limit: i64, page: i64) -> Result<Vec<DeviceRecord>> {
        let records = sqlx::query_as::<_, DeviceRecord>(&format!(
            "SELECT {COLUMNS} FROM devices WHERE account_id = ? ORDER BY id DESC LIMIT ? OFFSET ?"
        ))
        .bind(account_id)
        .bind(limit)
        .bind(page * limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Fetch a device by name
    pub async fn get_by_name(&self, name: &str, account_id: i64) -> Result<Option<DeviceRecord>> {
        let record = sqlx::query_as::<_, DeviceRecord>(&format!(
            "SELECT {COLUMNS} FROM devices WHERE name = ? AND account_id = ?"
        ))
        .bind(name)
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Get-or-insert on (name, account); the existing row wins
    pub async fn get_or_insert(&self, name: &str, account_id: i64) -> Result<DeviceRecord> {
        sqlx::query("INSERT OR IGNORE INTO devices (name, account_id) VALUES (?, ?)")
            .bind(name)
            .bind(account_id)
            .execute(&self.pool)
            .await?;

        self.get_by_name(name, account_id)
            .await?
            .ok_or_else(|| anyhow!("Device {} missing after upsert", name))
    }

    /// Update online/playing flags; false when no owned row matched
    pub async fn update_state(
        &self,
        device_id: i64,
        is_online: bool,
        is_playing: bool,
        account_id: i64,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE devices SET is_online = ?, is_playing = ? WHERE id = ? AND account_id = ?",
        )
        .bind(is_online)
        .bind(is_playing)
        .bind(device_id)
        .bind(account_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Device targeted by a command, scoped by account; 0 or 1 rows
    pub async fn get_containing_command(
        &self,
        command_id: i64,
        account_id: i64,
    ) -> Result<Vec<DeviceRecord>> {
        let records = sqlx::query_as::<_, DeviceRecord>(
            r#"
            SELECT d.id, d.name, d.is_online, d.is_playing, d.created FROM devices d
            JOIN device_commands dc ON d.id = dc.target_id
            WHERE dc.id = ? AND d.account_id = ?
            LIMIT 1
            "#,
        )
        .bind(command_id)
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
