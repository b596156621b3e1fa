//! Artists controller

use crate::db::{ArtistRecord, Database};
use crate::error::AppError;
use crate::validators::{Validator, validate_avatar};

pub struct ArtistsController {
    db: Database,
}

impl ArtistsController {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn all_artists(
        &self,
        account_id: i64,
        limit: i64,
        page: i64,
    ) -> Result<Vec<ArtistRecord>, AppError> {
        self.db
            .artists()
            .all(account_id, limit, page)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error getting account artists");
                AppError::internal()
            })
    }

    pub async fn artists_by_name(
        &self,
        account_id: i64,
        name: &str,
        limit: i64,
        page: i64,
    ) -> Result<Vec<ArtistRecord>, AppError> {
        self.db
            .artists()
            .search_by_name(name, account_id, limit, page)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error getting artists by name");
                AppError::internal()
            })
    }

    pub async fn artist_by_id(
        &self,
        account_id: i64,
        artist_id: i64,
    ) -> Result<Vec<ArtistRecord>, AppError> {
        self.db
            .artists()
            .get_by_id(artist_id, account_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error getting artist by id");
                AppError::internal()
            })
    }

    pub async fn new_artist(
        &self,
        account_id: i64,
        name: &str,
        avatar: &str,
    ) -> Result<ArtistRecord, AppError> {
        Validator::new(name, "name").min_length(1)?.max_length(100)?;
        validate_avatar(avatar)?;

        self.db
            .artists()
            .insert(name, avatar, account_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error inserting artist");
                AppError::internal()
            })
    }

    pub async fn update_artist(
        &self,
        account_id: i64,
        artist_id: i64,
        name: &str,
        avatar: &str,
    ) -> Result<bool, AppError> {
        Validator::new(name, "name").min_length(1)?.max_length(100)?;
        validate_avatar(avatar)?;

        self.db
            .artists()
            .update(artist_id, name, avatar, account_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error updating artist");
                AppError::internal()
            })
    }

    pub async fn remove_artist(&self, account_id: i64, artist_id: i64) -> Result<bool, AppError> {
        self.db
            .artists()
            .delete(artist_id, account_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error deleting artist");
                AppError::internal()
            })
    }

    /// Artist of a song without an ownership check, for nested resolution
    /// under an already-authorized parent.
    pub async fn artist_by_song_unchecked(
        &self,
        song_id: i64,
    ) -> Result<Option<ArtistRecord>, AppError> {
        self.db
            .artists()
            .get_by_song_id_unchecked(song_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error obtaining artist of song");
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
        let controller = ArtistsController::new(db);

        let artist = controller
            .new_artist(owner, "Aurora", "https://cdn.example.com/a.png")
            .await
            .unwrap();

        assert_eq!(controller.all_artists(owner, 10, 0).await.unwrap().len(), 1);
        assert!(controller.all_artists(other, 10, 0).await.unwrap().is_empty());

        // scoped update against a foreign account touches no row
        let updated = controller
            .update_artist(other, artist.id, "Hacked", "https://cdn.example.com/x.png")
            .await
            .unwrap();
        assert!(!updated);

        let found = controller.artist_by_id(owner, artist.id).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Aurora");

        assert!(!controller.remove_artist(other, artist.id).await.unwrap());
        assert!(controller.remove_artist(owner, artist.id).await.unwrap());
    }

    #[tokio::test]
    async fn search_by_name_matches_substring() {
        let db = memory_db().await;
        let (owner, _) = two_accounts(&db).await;
        let controller = ArtistsController::new(db);

        controller
            .new_artist(owner, "The Midnight Choir", "https://cdn.example.com/a.png")
            .await
            .unwrap();

        let hits = controller
            .artists_by_name(owner, "Midnight", 10, 0)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn validation_short_circuits_before_repository() {
        let db = empty_db().await;
        let controller = ArtistsController::new(db);

        assert_matches!(
            controller.new_artist(1, "", "https://cdn.example.com/a.png").await,
            Err(AppError::InvalidArgument { field: "name", .. })
        );
        assert_matches!(
            controller
                .new_artist(1, &"n".repeat(101), "https://cdn.example.com/a.png")
                .await,
            Err(AppError::InvalidArgument { field: "name", .. })
        );
        assert_matches!(
            controller.update_artist(1, 1, "ok", "not a url").await,
            Err(AppError::InvalidArgument { field: "avatar", .. })
        );
    }
}
