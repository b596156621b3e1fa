//! Devices controller
//!
//! Device creation is get-or-insert on (name, account). Optional provider
//! registration is a detached task: its failure is logged and never fails
//! the device upsert.

use crate::db::{Database, DeviceRecord};
use crate::error::AppError;
use crate::validators::Validator;

pub struct DevicesController {
    db: Database,
}

impl DevicesController {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn all_devices(
        &self,
        account_id: i64,
        limit: i64,
        page: i64,
    ) -> Result<Vec<DeviceRecord>, AppError> {
        self.db
            .devices()
            .all(account_id, limit, page)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error getting account devices");
                AppError::internal()
            })
    }

    pub async fn upsert_device(
        &self,
        account_id: i64,
        name: &str,
        register_as_provider: bool,
    ) -> Result<DeviceRecord, AppError> {
        Validator::new(name, "name").min_length(1)?.max_length(100)?;

        let device = self
            .db
            .devices()
            .get_or_insert(name, account_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error inserting device");
                AppError::internal()
            })?;

        if register_as_provider {
            let providers = self.db.song_providers();
            let registered = device.clone();
            tokio::spawn(async move {
                if let Err(e) = providers.insert_device_provider(account_id, &registered).await {
                    tracing::warn!(error = %e, device = %registered.name, "Error inserting provider");
                }
            });
        }

        Ok(device)
    }

    pub async fn update_device_state(
        &self,
        account_id: i64,
        device_id: i64,
        is_online: bool,
        is_playing: bool,
    ) -> Result<bool, AppError> {
        self.db
            .devices()
            .update_state(device_id, is_online, is_playing, account_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error updating device");
                AppError::internal()
            })
    }

    /// Acknowledge a command after verifying the targeted device is owned.
    pub async fn command_acknowledge(
        &self,
        account_id: i64,
        command_id: i64,
    ) -> Result<bool, AppError> {
        let devices = self
            .db
            .devices()
            .get_containing_command(command_id, account_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error checking command ownership");
                AppError::internal()
            })?;

        if devices.len() != 1 {
            return Err(AppError::Forbidden);
        }

        self.db
            .device_commands()
            .mark_acknowledged(command_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error updating command acknowledged");
                AppError::internal()
            })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::controller::testing::two_accounts;
    use crate::db::testing::{empty_db, memory_db};

    #[tokio::test]
    async fn upsert_is_idempotent_per_account() {
        let db = memory_db().await;
        let (owner, other) = two_accounts(&db).await;
        let controller = DevicesController::new(db.clone());

        let first = controller.upsert_device(owner, "kitchen", false).await.unwrap();
        let second = controller.upsert_device(owner, "kitchen", false).await.unwrap();
        assert_eq!(first.id, second.id);

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM devices WHERE name = 'kitchen'")
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(count, 1);

        // same name under another account is a distinct device
        let foreign = controller.upsert_device(other, "kitchen", false).await.unwrap();
        assert_ne!(foreign.id, first.id);
    }

    #[tokio::test]
    async fn provider_registration_is_best_effort() {
        let db = memory_db().await;
        let (owner, _) = two_accounts(&db).await;
        let controller = DevicesController::new(db.clone());

        let device = controller.upsert_device(owner, "living-room", true).await.unwrap();

        // the registration task runs detached; give it a beat
        for _ in 0..50 {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            let providers = db.song_providers().all(owner, 10, 0).await.unwrap();
            if providers.iter().any(|p| p.device_id == Some(device.id)) {
                return;
            }
        }
        panic!("device provider never registered");
    }

    #[tokio::test]
    async fn acknowledge_requires_owned_device() {
        let db = memory_db().await;
        let (owner, other) = two_accounts(&db).await;
        let controller = DevicesController::new(db.clone());

        let device = controller.upsert_device(owner, "kitchen", false).await.unwrap();
        sqlx::query("INSERT INTO device_commands (command, target_id) VALUES ('play', ?)")
            .bind(device.id)
            .execute(db.pool())
            .await
            .unwrap();
        let command_id: i64 = sqlx::query_scalar("SELECT id FROM device_commands")
            .fetch_one(db.pool())
            .await
            .unwrap();

        assert_matches!(
            controller.command_acknowledge(other, command_id).await,
            Err(AppError::Forbidden)
        );
        assert!(controller.command_acknowledge(owner, command_id).await.unwrap());
    }

    #[tokio::test]
    async fn name_is_validated_before_upsert() {
        let db = empty_db().await;
        let controller = DevicesController::new(db);

        assert_matches!(
            controller.upsert_device(1, "", false).await,
            Err(AppError::InvalidArgument { field: "name", .. })
        );
    }
}
