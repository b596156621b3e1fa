//! External services and shared infrastructure

pub mod auth;
pub mod cache;
pub mod featured;
pub mod resolver;
pub mod youtube;

pub use auth::{AuthToken, TokenData};
pub use cache::TtlCache;
pub use featured::{FeaturedCharts, FeaturedPlaylist, FeaturedTrack};
pub use resolver::{MusicResolver, ProviderKind, ProviderSearchResult, WELL_KNOWN_PROVIDER_ID};
pub use youtube::{ArtistSearchResult, SearchedSong, YoutubeClient};
