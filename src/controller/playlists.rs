//! Playlists controller
//!
//! Covers owned playlists plus the scraped featured charts.

use std::sync::Arc;

use crate::db::{Database, PlaylistItemRecord, PlaylistRecord};
use crate::error::AppError;
use crate::services::{FeaturedCharts, FeaturedPlaylist};
use crate::validators::{Validator, validate_avatar};

pub struct PlaylistsController {
    db: Database,
    charts: Arc<FeaturedCharts>,
}

impl PlaylistsController {
    pub fn new(db: Database, charts: Arc<FeaturedCharts>) -> Self {
        Self { db, charts }
    }

    pub async fn featured_playlist_by_id(
        &self,
        id: &str,
    ) -> Result<Vec<FeaturedPlaylist>, AppError> {
        let playlist = self.charts.by_id(id).await.map_err(|e| {
            tracing::error!(error = %e, chart = id, "Error getting featured list");
            AppError::internal()
        })?;

        Ok(vec![playlist])
    }

    pub async fn featured_playlists(&self) -> Result<Vec<FeaturedPlaylist>, AppError> {
        self.charts.all().await.map_err(|e| {
            tracing::error!(error = %e, "Error getting featured lists");
            AppError::internal()
        })
    }

    pub async fn playlist_by_id(
        &self,
        account_id: i64,
        playlist_id: i64,
    ) -> Result<Vec<PlaylistRecord>, AppError> {
        self.db
            .playlists()
            .get_by_id(playlist_id, account_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, playlist_id, "Error getting playlist");
                AppError::internal()
            })
    }

    pub async fn all_playlists(
        &self,
        account_id: i64,
        limit: i64,
        page: i64,
    ) -> Result<Vec<PlaylistRecord>, AppError> {
        self.db
            .playlists()
            .all(account_id, limit, page)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error getting playlists");
                AppError::internal()
            })
    }

    pub async fn playlists_by_name(
        &self,
        account_id: i64,
        name: &str,
        limit: i64,
        page: i64,
    ) -> Result<Vec<PlaylistRecord>, AppError> {
        self.db
            .playlists()
            .search_by_name(name, account_id, limit, page)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, name, "Error getting playlists by name");
                AppError::internal()
            })
    }

    pub async fn new_playlist(
        &self,
        account_id: i64,
        name: &str,
        avatar: &str,
    ) -> Result<PlaylistRecord, AppError> {
        Validator::new(name, "name").min_length(1)?.max_length(50)?;
        validate_avatar(avatar)?;

        self.db
            .playlists()
            .insert(name, avatar, account_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error inserting playlist");
                AppError::internal()
            })
    }

    pub async fn update_playlist(
        &self,
        account_id: i64,
        playlist_id: i64,
        name: &str,
        avatar: &str,
    ) -> Result<bool, AppError> {
        Validator::new(name, "name").min_length(1)?.max_length(50)?;
        validate_avatar(avatar)?;

        self.db
            .playlists()
            .update(playlist_id, account_id, name, avatar)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error updating playlist");
                AppError::internal()
            })
    }

    pub async fn delete_playlist(
        &self,
        account_id: i64,
        playlist_id: i64,
    ) -> Result<bool, AppError> {
        self.db
            .playlists()
            .delete(playlist_id, account_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error deleting playlist");
                AppError::internal()
            })
    }

    /// Remove an item after verifying the containing playlist is owned.
    pub async fn remove_from_playlist(
        &self,
        account_id: i64,
        item_id: i64,
    ) -> Result<bool, AppError> {
        let playlists = self
            .db
            .playlists()
            .get_containing_item(item_id, account_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error checking playlist ownership");
                AppError::internal()
            })?;

        if playlists.len() != 1 {
            return Err(AppError::Forbidden);
        }

        self.db.playlist_items().remove(item_id).await.map_err(|e| {
            tracing::error!(error = %e, "Error removing item from playlist");
            AppError::internal()
        })
    }

    /// Insert a song; both the playlist and the song must resolve under the
    /// caller's account.
    pub async fn insert_playlist_song(
        &self,
        account_id: i64,
        playlist_id: i64,
        song_id: i64,
    ) -> Result<bool, AppError> {
        let playlists_db = self.db.playlists();
        let songs_db = self.db.songs();
        let (playlists, songs) = futures::try_join!(
            playlists_db.get_by_id(playlist_id, account_id),
            songs_db.get_by_id(song_id, account_id)
        )
        .map_err(|e| {
            tracing::error!(error = %e, "Error checking playlist item ownership");
            AppError::internal()
        })?;

        if playlists.len() != 1 || songs.len() != 1 {
            return Err(AppError::Forbidden);
        }

        self.db
            .playlist_items()
            .insert_song(playlist_id, song_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error inserting playlist item");
                AppError::internal()
            })
    }

    /// Items of a playlist, no account check; nested resolution only.
    pub async fn playlist_items_unchecked(
        &self,
        playlist_id: i64,
        limit: i64,
        page: i64,
    ) -> Result<Vec<PlaylistItemRecord>, AppError> {
        self.db
            .playlist_items()
            .list(playlist_id, limit, page)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error obtaining playlist items");
                AppError::internal()
            })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::controller::testing::{test_charts, two_accounts};
    use crate::db::testing::{empty_db, memory_db};

    async fn seed_playlist(db: &Database, account_id: i64) -> i64 {
        db.playlists()
            .insert("Jams", "https://cdn.example.com/p.png", account_id)
            .await
            .unwrap()
            .id
    }

    async fn seed_song(db: &Database, account_id: i64) -> i64 {
        let artist = db
            .artists()
            .insert("Someone", "https://cdn.example.com/a.png", account_id)
            .await
            .unwrap();
        db.songs().insert(artist.id, "Track").await.unwrap().id
    }

    #[tokio::test]
    async fn insert_requires_both_owned() {
        let db = memory_db().await;
        let (owner, other) = two_accounts(&db).await;
        let playlist_id = seed_playlist(&db, owner).await;
        let own_song = seed_song(&db, owner).await;
        let foreign_song = seed_song(&db, other).await;
        let controller = PlaylistsController::new(db.clone(), test_charts());

        assert!(
            controller
                .insert_playlist_song(owner, playlist_id, own_song)
                .await
                .unwrap()
        );

        // foreign song under an owned playlist
        assert_matches!(
            controller
                .insert_playlist_song(owner, playlist_id, foreign_song)
                .await,
            Err(AppError::Forbidden)
        );

        // owned song under a foreign playlist
        assert_matches!(
            controller
                .insert_playlist_song(other, playlist_id, foreign_song)
                .await,
            Err(AppError::Forbidden)
        );
    }

    #[tokio::test]
    async fn remove_verifies_containing_playlist() {
        let db = memory_db().await;
        let (owner, other) = two_accounts(&db).await;
        let playlist_id = seed_playlist(&db, owner).await;
        let song_id = seed_song(&db, owner).await;
        let controller = PlaylistsController::new(db.clone(), test_charts());

        controller
            .insert_playlist_song(owner, playlist_id, song_id)
            .await
            .unwrap();
        let item_id = controller
            .playlist_items_unchecked(playlist_id, 50, 0)
            .await
            .unwrap()[0]
            .id;

        assert_matches!(
            controller.remove_from_playlist(other, item_id).await,
            Err(AppError::Forbidden)
        );
        assert!(controller.remove_from_playlist(owner, item_id).await.unwrap());
    }

    #[tokio::test]
    async fn items_reconstruct_song_side() {
        let db = memory_db().await;
        let (owner, _) = two_accounts(&db).await;
        let playlist_id = seed_playlist(&db, owner).await;
        let song_id = seed_song(&db, owner).await;
        let controller = PlaylistsController::new(db.clone(), test_charts());

        controller
            .insert_playlist_song(owner, playlist_id, song_id)
            .await
            .unwrap();

        let items = controller
            .playlist_items_unchecked(playlist_id, 50, 0)
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].song_id, Some(song_id));
        assert_eq!(items[0].radio_id, None);
        assert_eq!(items[0].song.as_ref().unwrap().name, "Track");
        assert!(items[0].radio.is_none());
    }

    #[tokio::test]
    async fn validation_short_circuits_before_repository() {
        let db = empty_db().await;
        let controller = PlaylistsController::new(db, test_charts());

        assert_matches!(
            controller
                .new_playlist(1, &"p".repeat(51), "https://cdn.example.com/p.png")
                .await,
            Err(AppError::InvalidArgument { field: "name", .. })
        );
    }
}
