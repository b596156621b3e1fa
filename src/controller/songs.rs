//! Songs controller
//!
//! Song mutations verify ownership through the owning artist before acting.

use std::sync::Arc;

use crate::db::{Database, SongProviderRecord, SongRecord, SongSourceRecord};
use crate::error::AppError;
use crate::services::MusicResolver;
use crate::validators::Validator;

/// A song source with its playable URI resolved.
#[derive(Debug, Clone)]
pub struct ResolvedSource {
    pub song_id: Option<i64>,
    pub provider_id: i64,
    pub source_id: String,
    pub source_uri: String,
}

impl From<SongSourceRecord> for ResolvedSource {
    fn from(record: SongSourceRecord) -> Self {
        Self {
            song_id: Some(record.song_id),
            provider_id: record.provider_id,
            source_id: record.source_id,
            source_uri: record.source_uri,
        }
    }
}

pub struct SongsController {
    db: Database,
    resolver: Arc<MusicResolver>,
}

impl SongsController {
    pub fn new(db: Database, resolver: Arc<MusicResolver>) -> Self {
        Self { db, resolver }
    }

    pub async fn all_songs(
        &self,
        account_id: i64,
        limit: i64,
        page: i64,
    ) -> Result<Vec<SongRecord>, AppError> {
        self.db
            .songs()
            .all(account_id, limit, page)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error getting songs");
                AppError::internal()
            })
    }

    pub async fn search_songs_by_name(
        &self,
        account_id: i64,
        name: &str,
        limit: i64,
        page: i64,
    ) -> Result<Vec<SongRecord>, AppError> {
        self.db
            .songs()
            .search_by_name(name, account_id, limit, page)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error getting songs by name");
                AppError::internal()
            })
    }

    /// Sources of an owned song, each resolved to a playable URI.
    pub async fn all_song_sources(
        &self,
        account_id: i64,
        song_id: i64,
    ) -> Result<Vec<ResolvedSource>, AppError> {
        let sources = self
            .db
            .song_sources()
            .list_for_song(song_id, account_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error getting song sources");
                AppError::internal()
            })?;

        let resolved = futures::future::try_join_all(sources.into_iter().map(|source| async move {
            let uri = self
                .resolver
                .resolve(source.provider_id, &source.source_id, account_id)
                .await?;
            let mut resolved = ResolvedSource::from(source);
            resolved.source_uri = uri;
            Ok::<_, anyhow::Error>(resolved)
        }))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Error resolving song sources");
            AppError::internal()
        })?;

        Ok(resolved)
    }

    pub async fn song_providers(
        &self,
        account_id: i64,
        limit: i64,
        page: i64,
    ) -> Result<Vec<SongProviderRecord>, AppError> {
        self.db
            .song_providers()
            .all(account_id, limit, page)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error getting song providers");
                AppError::internal()
            })
    }

    /// Create a song under an artist the caller owns.
    pub async fn new_song(
        &self,
        account_id: i64,
        artist_id: i64,
        name: &str,
    ) -> Result<SongRecord, AppError> {
        Validator::new(name, "name").min_length(1)?.max_length(200)?;

        let artists = self
            .db
            .artists()
            .get_by_id(artist_id, account_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error checking artist ownership");
                AppError::internal()
            })?;

        if artists.len() != 1 {
            return Err(AppError::Forbidden);
        }

        self.db.songs().insert(artist_id, name).await.map_err(|e| {
            tracing::error!(error = %e, "Error inserting new song");
            AppError::internal()
        })
    }

    pub async fn update_song(
        &self,
        account_id: i64,
        song_id: i64,
        name: &str,
    ) -> Result<bool, AppError> {
        Validator::new(name, "name").min_length(1)?.max_length(200)?;
        self.verify_song_owner(account_id, song_id).await?;

        self.db
            .songs()
            .update_name(song_id, name)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error updating song");
                AppError::internal()
            })
    }

    pub async fn delete_song(&self, account_id: i64, song_id: i64) -> Result<bool, AppError> {
        self.verify_song_owner(account_id, song_id).await?;

        self.db.songs().delete(song_id).await.map_err(|e| {
            tracing::error!(error = %e, "Error deleting song");
            AppError::internal()
        })
    }

    pub async fn insert_song_source(
        &self,
        account_id: i64,
        provider_id: i64,
        song_id: i64,
        source_id: &str,
        source_uri: &str,
    ) -> Result<bool, AppError> {
        self.verify_song_owner(account_id, song_id).await?;

        self.db
            .song_sources()
            .insert(provider_id, song_id, source_id, source_uri)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error inserting song source");
                AppError::internal()
            })
    }

    pub async fn increment_played_song(
        &self,
        account_id: i64,
        song_id: i64,
    ) -> Result<bool, AppError> {
        self.verify_song_owner(account_id, song_id).await?;

        self.db
            .songs()
            .increment_played(song_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error incrementing song play count");
                AppError::internal()
            })
    }

    /// Songs of one artist, no account check; nested resolution only.
    pub async fn artist_songs(
        &self,
        artist_id: i64,
        limit: i64,
        page: i64,
    ) -> Result<Vec<SongRecord>, AppError> {
        self.db
            .songs()
            .list_by_artist(artist_id, limit, page)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error obtaining artist songs");
                AppError::internal()
            })
    }

    /// Sources of a song, no account check; nested resolution only.
    pub async fn song_sources_unchecked(
        &self,
        song_id: i64,
    ) -> Result<Vec<SongSourceRecord>, AppError> {
        self.db
            .song_sources()
            .list_for_song_unchecked(song_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error obtaining song sources");
                AppError::internal()
            })
    }

    pub async fn songs_by_genre(
        &self,
        account_id: i64,
        genre_id: i64,
        limit: i64,
        page: i64,
    ) -> Result<Vec<SongRecord>, AppError> {
        self.db
            .songs()
            .list_by_genre(genre_id, account_id, limit, page)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error obtaining songs by genre");
                AppError::internal()
            })
    }

    /// Resolve an ad-hoc (provider, source) pair to a playable URI. An
    /// unknown device-backed provider resolves to an empty URI.
    pub async fn resolve_source_by_id(
        &self,
        account_id: i64,
        provider_id: i64,
        source_id: &str,
    ) -> Result<ResolvedSource, AppError> {
        let uri = self
            .resolver
            .resolve(provider_id, source_id, account_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error obtaining source for song");
                AppError::internal()
            })?;

        Ok(ResolvedSource {
            song_id: None,
            provider_id,
            source_id: source_id.to_string(),
            source_uri: uri,
        })
    }

    async fn verify_song_owner(&self, account_id: i64, song_id: i64) -> Result<(), AppError> {
        let artist = self
            .db
            .artists()
            .get_by_song_id(song_id, account_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error checking song ownership");
                AppError::internal()
            })?;

        match artist {
            Some(_) => Ok(()),
            None => Err(AppError::Forbidden),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::controller::testing::{test_resolver, two_accounts};
    use crate::db::testing::{empty_db, memory_db};

    async fn seed_song(db: &Database, account_id: i64) -> (i64, i64) {
        let artist = db
            .artists()
            .insert("Seeded Artist", "https://cdn.example.com/a.png", account_id)
            .await
            .unwrap();
        let song = db.songs().insert(artist.id, "Seeded Song").await.unwrap();
        (artist.id, song.id)
    }

    #[tokio::test]
    async fn play_count_owner_only() {
        let db = memory_db().await;
        let (owner, other) = two_accounts(&db).await;
        let (_, song_id) = seed_song(&db, owner).await;
        let controller = SongsController::new(db.clone(), test_resolver(db.clone()));

        assert!(controller.increment_played_song(owner, song_id).await.unwrap());
        let songs = controller.all_songs(owner, 10, 0).await.unwrap();
        assert_eq!(songs[0].played, 1);

        assert_matches!(
            controller.increment_played_song(other, song_id).await,
            Err(AppError::Forbidden)
        );
        let songs = controller.all_songs(owner, 10, 0).await.unwrap();
        assert_eq!(songs[0].played, 1);
    }

    #[tokio::test]
    async fn new_song_requires_owned_artist() {
        let db = memory_db().await;
        let (owner, other) = two_accounts(&db).await;
        let (artist_id, _) = seed_song(&db, owner).await;
        let controller = SongsController::new(db.clone(), test_resolver(db.clone()));

        assert_matches!(
            controller.new_song(other, artist_id, "Sneaky").await,
            Err(AppError::Forbidden)
        );

        let song = controller.new_song(owner, artist_id, "Legit").await.unwrap();
        assert_eq!(song.played, 0);
        assert_eq!(song.duration, 0);
    }

    #[tokio::test]
    async fn update_and_delete_are_ownership_gated() {
        let db = memory_db().await;
        let (owner, other) = two_accounts(&db).await;
        let (_, song_id) = seed_song(&db, owner).await;
        let controller = SongsController::new(db.clone(), test_resolver(db.clone()));

        assert_matches!(
            controller.update_song(other, song_id, "Renamed").await,
            Err(AppError::Forbidden)
        );
        assert_matches!(
            controller.delete_song(other, song_id).await,
            Err(AppError::Forbidden)
        );

        assert!(controller.update_song(owner, song_id, "Renamed").await.unwrap());
        assert!(controller.delete_song(owner, song_id).await.unwrap());
    }

    #[tokio::test]
    async fn sources_resolve_device_backed_provider() {
        let db = memory_db().await;
        let (owner, _) = two_accounts(&db).await;
        let (_, song_id) = seed_song(&db, owner).await;

        let device = db.devices().get_or_insert("kitchen", owner).await.unwrap();
        db.song_providers()
            .insert_device_provider(owner, &device)
            .await
            .unwrap();
        let provider = db
            .song_providers()
            .all(owner, 10, 0)
            .await
            .unwrap()
            .into_iter()
            .find(|p| p.kind == crate::db::song_providers::DEVICE_BACKED_TYPE)
            .unwrap()
            .id;

        let controller = SongsController::new(db.clone(), test_resolver(db.clone()));
        controller
            .insert_song_source(owner, provider, song_id, "track-9", "")
            .await
            .unwrap();

        let sources = controller.all_song_sources(owner, song_id).await.unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(
            sources[0].source_uri,
            "http://localhost:9900/stream/kitchen?q=track-9&k=test-key"
        );
    }

    #[tokio::test]
    async fn resolution_soft_fails_for_unknown_provider() {
        let db = memory_db().await;
        let (owner, _) = two_accounts(&db).await;
        let controller = SongsController::new(db.clone(), test_resolver(db.clone()));

        let source = controller
            .resolve_source_by_id(owner, 999, "whatever")
            .await
            .unwrap();
        assert_eq!(source.source_uri, "");
        assert_eq!(source.provider_id, 999);
    }

    #[tokio::test]
    async fn validation_short_circuits_before_repository() {
        let db = empty_db().await;
        let controller = SongsController::new(db.clone(), test_resolver(db));

        assert_matches!(
            controller.new_song(1, 1, "").await,
            Err(AppError::InvalidArgument { field: "name", .. })
        );
        assert_matches!(
            controller.update_song(1, 1, &"x".repeat(201)).await,
            Err(AppError::InvalidArgument { field: "name", .. })
        );
    }
}
