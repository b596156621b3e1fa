//! Database connection and repositories
//!
//! One repository per entity, each wrapping the pool with entity-specific
//! SQL. Account scoping happens inside the queries themselves; repositories
//! never catch or translate errors.

pub mod accounts;
pub mod artists;
pub mod device_commands;
pub mod devices;
pub mod genres;
pub mod playlist_items;
pub mod playlists;
pub mod radios;
pub mod schema;
pub mod song_providers;
pub mod song_sources;
pub mod songs;

use anyhow::Result;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

pub use accounts::{AccountRecord, AccountRepository};
pub use artists::{ArtistRecord, ArtistRepository};
pub use device_commands::{DeviceCommandRecord, DeviceCommandRepository};
pub use devices::{DeviceRecord, DeviceRepository};
pub use genres::{GenreRecord, GenreRepository};
pub use playlist_items::{PlaylistItemRecord, PlaylistItemRepository};
pub use playlists::{PlaylistRecord, PlaylistRepository};
pub use radios::{RadioRecord, RadioRepository};
pub use song_providers::{SongProviderRecord, SongProviderRepository};
pub use song_sources::{SongSourceRecord, SongSourceRepository};
pub use songs::{SongRecord, SongRepository};

/// Timestamp stamped onto freshly inserted entities.
pub(crate) fn now_iso8601() -> String {
    chrono::Utc::now()
        .to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

/// Database wrapper providing connection pool access
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database wrapper from an existing pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn get_max_connections() -> u32 {
        std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10)
    }

    /// Create a new database connection pool
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(Self::get_max_connections())
            .connect(url)
            .await?;

        Ok(Self { pool })
    }

    /// Get the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn accounts(&self) -> AccountRepository {
        AccountRepository::new(self.pool.clone())
    }

    pub fn artists(&self) -> ArtistRepository {
        ArtistRepository::new(self.pool.clone())
    }

    pub fn songs(&self) -> SongRepository {
        SongRepository::new(self.pool.clone())
    }

    pub fn song_sources(&self) -> SongSourceRepository {
        SongSourceRepository::new(self.pool.clone())
    }

    pub fn song_providers(&self) -> SongProviderRepository {
        SongProviderRepository::new(self.pool.clone())
    }

    pub fn playlists(&self) -> PlaylistRepository {
        PlaylistRepository::new(self.pool.clone())
    }

    pub fn playlist_items(&self) -> PlaylistItemRepository {
        PlaylistItemRepository::new(self.pool.clone())
    }

    pub fn radios(&self) -> RadioRepository {
        RadioRepository::new(self.pool.clone())
    }

    pub fn devices(&self) -> DeviceRepository {
        DeviceRepository::new(self.pool.clone())
    }

    pub fn device_commands(&self) -> DeviceCommandRepository {
        DeviceCommandRepository::new(self.pool.clone())
    }

    pub fn genres(&self) -> GenreRepository {
        GenreRepository::new(self.pool.clone())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// In-memory database with the full schema applied.
    pub async fn memory_db() -> Database {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        schema::init(&pool).await.expect("schema init");
        Database::new(pool)
    }

    /// In-memory database with no tables at all.
    pub async fn empty_db() -> Database {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        Database::new(pool)
    }
}
