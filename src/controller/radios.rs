//! Radios controller

use crate::db::{Database, RadioRecord};
use crate::error::AppError;
use crate::validators::{Validator, validate_avatar};

pub struct RadiosController {
    db: Database,
}

impl RadiosController {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn all_radios(
        &self,
        account_id: i64,
        limit: i64,
        page: i64,
    ) -> Result<Vec<RadioRecord>, AppError> {
        self.db
            .radios()
            .all(account_id, limit, page)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error getting radios");
                AppError::internal()
            })
    }

    pub async fn new_radio(
        &self,
        account_id: i64,
        name: &str,
        stream_url: &str,
        avatar: &str,
    ) -> Result<RadioRecord, AppError> {
        Validator::new(name, "name").min_length(1)?.max_length(100)?;
        validate_avatar(avatar)?;
        Validator::new(stream_url, "stream").is_valid_url()?;

        self.db
            .radios()
            .insert(account_id, name, stream_url, avatar)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error inserting radio");
                AppError::internal()
            })
    }

    pub async fn update_radio(
        &self,
        account_id: i64,
        radio_id: i64,
        name: &str,
        stream_url: &str,
        avatar: &str,
    ) -> Result<bool, AppError> {
        Validator::new(name, "name").min_length(1)?.max_length(100)?;
        validate_avatar(avatar)?;
        Validator::new(stream_url, "stream").is_valid_url()?;

        self.db
            .radios()
            .update(radio_id, account_id, name, stream_url, avatar)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error updating radio");
                AppError::internal()
            })
    }

    pub async fn delete_radio(&self, account_id: i64, radio_id: i64) -> Result<bool, AppError> {
        self.db
            .radios()
            .delete(radio_id, account_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error deleting radio");
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
    async fn crud_is_scoped_to_the_account() {
        let db = memory_db().await;
        let (owner, other) = two_accounts(&db).await;
        let controller = RadiosController::new(db);

        let radio = controller
            .new_radio(
                owner,
                "Morning FM",
                "https://stream.example.com/morning",
                "https://cdn.example.com/r.png",
            )
            .await
            .unwrap();
        assert_eq!(radio.stream_url, "https://stream.example.com/morning");

        assert!(
            !controller
                .update_radio(
                    other,
                    radio.id,
                    "Taken Over",
                    "https://stream.example.com/x",
                    "https://cdn.example.com/r.png",
                )
                .await
                .unwrap()
        );
        assert!(!controller.delete_radio(other, radio.id).await.unwrap());
        assert_eq!(controller.all_radios(owner, 10, 0).await.unwrap().len(), 1);
        assert!(controller.delete_radio(owner, radio.id).await.unwrap());
    }

    #[tokio::test]
    async fn stream_url_is_validated() {
        let db = empty_db().await;
        let controller = RadiosController::new(db);

        assert_matches!(
            controller
                .new_radio(1, "FM", "not a url", "https://cdn.example.com/r.png")
                .await,
            Err(AppError::InvalidArgument { field: "stream", .. })
        );
    }
}
