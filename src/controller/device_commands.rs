//! Device commands controller

use crate::db::{Database, DeviceCommandRecord};
use crate::error::AppError;

pub struct DeviceCommandsController {
    db: Database,
}

impl DeviceCommandsController {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Commands newer than the given id across the account's devices.
    pub async fn commands_since(
        &self,
        account_id: i64,
        command_id: i64,
    ) -> Result<Vec<DeviceCommandRecord>, AppError> {
        self.db
            .device_commands()
            .list_since(command_id, account_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error getting device commands");
                AppError::internal()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::testing::two_accounts;
    use crate::db::testing::memory_db;

    #[tokio::test]
    async fn only_own_commands_after_cursor() {
        let db = memory_db().await;
        let (owner, other) = two_accounts(&db).await;

        let mine = db.devices().get_or_insert("mine", owner).await.unwrap();
        let theirs = db.devices().get_or_insert("theirs", other).await.unwrap();

        for (command, target) in [("play", mine.id), ("pause", mine.id), ("play", theirs.id)] {
            sqlx::query("INSERT INTO device_commands (command, target_id) VALUES (?, ?)")
                .bind(command)
                .bind(target)
                .execute(db.pool())
                .await
                .unwrap();
        }

        let controller = DeviceCommandsController::new(db);

        let all = controller.commands_since(owner, 0).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|c| c.target_id == mine.id));

        let first_id = all.iter().map(|c| c.id).min().unwrap();
        let newer = controller.commands_since(owner, first_id).await.unwrap();
        assert_eq!(newer.len(), 1);
    }
}
