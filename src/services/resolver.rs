//! Song-source resolution
//!
//! Turns a stored (provider, source) reference into a playable URL. The
//! provider registry is closed: the well-known integration resolves through
//! YouTube, anything else is a device-backed provider looked up per account.

use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::db::Database;

use super::youtube::{ArtistSearchResult, YoutubeClient};

pub const WELL_KNOWN_PROVIDER_ID: i64 = 1;
const WELL_KNOWN_PROVIDER_NAME: &str = "youtube";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    WellKnown,
    DeviceBacked(i64),
}

impl ProviderKind {
    pub fn from_id(provider_id: i64) -> Self {
        if provider_id == WELL_KNOWN_PROVIDER_ID {
            Self::WellKnown
        } else {
            Self::DeviceBacked(provider_id)
        }
    }
}

/// Search hit annotated with the provider that produced it.
#[derive(Debug, Clone)]
pub struct ProviderSearchResult {
    pub id: i64,
    pub name: String,
    pub artist: ArtistSearchResult,
}

pub struct MusicResolver {
    db: Database,
    config: Arc<Config>,
    youtube: Arc<YoutubeClient>,
}

impl MusicResolver {
    pub fn new(db: Database, config: Arc<Config>, youtube: Arc<YoutubeClient>) -> Self {
        Self {
            db,
            config,
            youtube,
        }
    }

    /// Resolve a source reference to a playable URL.
    ///
    /// A device-backed provider with no row for this account yields an empty
    /// string, not an error.
    pub async fn resolve(
        &self,
        provider_id: i64,
        source_id: &str,
        account_id: i64,
    ) -> Result<String> {
        match ProviderKind::from_id(provider_id) {
            ProviderKind::WellKnown => self.youtube.audio_url(source_id).await,
            ProviderKind::DeviceBacked(id) => {
                let provider = self.db.song_providers().get_by_id(id, account_id).await?;

                Ok(match provider {
                    Some(provider) => format!(
                        "{}{}?q={}&k={}",
                        self.config.device_provider_url,
                        provider.name,
                        source_id,
                        self.config.api_key
                    ),
                    None => String::new(),
                })
            }
        }
    }

    /// Suggested playlists for an artist across all registered providers.
    pub async fn search_playlists(&self, artist_name: &str) -> Result<Vec<ProviderSearchResult>> {
        if artist_name.is_empty() {
            return Ok(Vec::new());
        }
        let artists = self.youtube.playlist_search(artist_name).await?;
        Ok(wrap_well_known(artists))
    }

    /// Organic search results across all registered providers.
    pub async fn organic_search(&self, query: &str) -> Result<Vec<ProviderSearchResult>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let artists = self.youtube.video_search(query).await?;
        Ok(wrap_well_known(artists))
    }
}

fn wrap_well_known(artists: Vec<ArtistSearchResult>) -> Vec<ProviderSearchResult> {
    artists
        .into_iter()
        .map(|artist| ProviderSearchResult {
            id: WELL_KNOWN_PROVIDER_ID,
            name: WELL_KNOWN_PROVIDER_NAME.to_string(),
            artist,
        })
        .collect()
}
