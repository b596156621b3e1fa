//! Controllers
//!
//! One per entity family. Each composes repositories, validators and
//! ownership checks into account-scoped use cases, and translates repository
//! failures into the domain error taxonomy: the failure is logged with
//! context here and surfaces as a generic `Internal` error, never raw.

pub mod account;
pub mod artists;
pub mod device_commands;
pub mod devices;
pub mod genres;
pub mod playlists;
pub mod radios;
pub mod songs;

pub use account::AccountController;
pub use artists::ArtistsController;
pub use device_commands::DeviceCommandsController;
pub use devices::DevicesController;
pub use genres::GenresController;
pub use playlists::PlaylistsController;
pub use radios::RadiosController;
pub use songs::{ResolvedSource, SongsController};

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use crate::config::Config;
    use crate::db::Database;
    use crate::services::{FeaturedCharts, MusicResolver, TtlCache, YoutubeClient};

    pub fn test_config() -> Arc<Config> {
        Arc::new(Config {
            port: 0,
            database_url: String::new(),
            jwt_secret: "controller-test-secret".to_string(),
            default_account_id: 1,
            device_provider_url: "http://localhost:9900/stream/".to_string(),
            api_key: "test-key".to_string(),
        })
    }

    pub fn test_resolver(db: Database) -> Arc<MusicResolver> {
        let youtube = Arc::new(YoutubeClient::new(
            Arc::new(TtlCache::new()),
            Arc::new(TtlCache::new()),
        ));
        Arc::new(MusicResolver::new(db, test_config(), youtube))
    }

    pub fn test_charts() -> Arc<FeaturedCharts> {
        Arc::new(FeaturedCharts::new(Arc::new(TtlCache::new())))
    }

    /// Two registered accounts, the common fixture for ownership tests.
    pub async fn two_accounts(db: &Database) -> (i64, i64) {
        let a = db.accounts().insert("owner@example.com", "hash-a").await.unwrap();
        let b = db.accounts().insert("other@example.com", "hash-b").await.unwrap();
        (a.id, b.id)
    }
}
