//! Device command repository

use anyhow::Result;
use sqlx::SqlitePool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DeviceCommandRecord {
    pub id: i64,
    pub command: String,
    pub target_id: i64,
    pub acknowledged: bool,
    pub created: String,
}

pub struct DeviceCommandRepository {
    pool: SqlitePool,
}

impl DeviceCommandRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Commands newer than the given id across an account's devices
    pub async fn list_since(
        &self,
        command_id: i64,
        account_id: i64,
    ) -> Result<Vec<DeviceCommandRecord>> {
        let records = sqlx::query_as::<_, DeviceCommandRecord>(
            r#"
            SELECT dc.id, dc.command, dc.target_id, dc.acknowledged, dc.created
            FROM device_commands dc
            JOIN devices d ON dc.target_id = d.id
            WHERE dc.id > ? AND d.account_id = ?
            "#,
        )
        .bind(command_id)
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Mark a command as acknowledged
    pub async fn mark_acknowledged(&self, command_id: i64) -> Result<bool> {
        let result = sqlx::query("UPDATE device_commands SET acknowledged = 1 WHERE id = ?")
            .bind(command_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
