//! GraphQL object types
//!
//! Thin mirrors of repository records and service results. Nested fields
//! (artist songs, song sources, playlist items) resolve through the
//! unchecked controller variants: the parent row was already fetched scoped
//! to the caller's account.

use async_graphql::{ComplexObject, Context, ErrorExtensions, Result, SimpleObject};

use crate::controller::ResolvedSource;
use crate::db::{
    AccountRecord, ArtistRecord, DeviceCommandRecord, DeviceRecord, GenreRecord,
    PlaylistItemRecord, PlaylistRecord, RadioRecord, SongProviderRecord, SongRecord,
    SongSourceRecord,
};
use crate::services;

use super::auth::AuthExt;
use super::helpers::{artists_controller, playlists_controller, songs_controller};

#[derive(Debug, SimpleObject)]
pub struct Auth {
    pub scheme: String,
    pub token: String,
    pub expires: i64,
}

impl From<services::AuthToken> for Auth {
    fn from(token: services::AuthToken) -> Self {
        Self {
            scheme: token.scheme,
            token: token.token,
            expires: token.expires,
        }
    }
}

#[derive(Debug, SimpleObject)]
pub struct Account {
    pub id: i64,
    pub email: String,
    pub created: String,
}

impl From<AccountRecord> for Account {
    fn from(record: AccountRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            created: record.created,
        }
    }
}

#[derive(Debug, SimpleObject)]
#[graphql(rename_fields = "snake_case")]
pub struct Device {
    pub id: i64,
    pub name: String,
    pub is_online: bool,
    pub is_playing: bool,
    pub created: String,
}

impl From<DeviceRecord> for Device {
    fn from(record: DeviceRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            is_online: record.is_online,
            is_playing: record.is_playing,
            created: record.created,
        }
    }
}

#[derive(Debug, SimpleObject)]
#[graphql(rename_fields = "snake_case")]
pub struct DeviceCommand {
    pub id: i64,
    pub command: String,
    pub target_id: i64,
    pub acknowledged: bool,
    pub created: String,
}

impl From<DeviceCommandRecord> for DeviceCommand {
    fn from(record: DeviceCommandRecord) -> Self {
        Self {
            id: record.id,
            command: record.command,
            target_id: record.target_id,
            acknowledged: record.acknowledged,
            created: record.created,
        }
    }
}

#[derive(Debug, SimpleObject)]
#[graphql(rename_fields = "snake_case")]
pub struct Radio {
    pub id: i64,
    pub name: String,
    pub avatar: Option<String>,
    pub stream_url: String,
    pub created: String,
}

impl From<RadioRecord> for Radio {
    fn from(record: RadioRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            avatar: record.avatar,
            stream_url: record.stream_url,
            created: record.created,
        }
    }
}

#[derive(Debug, SimpleObject)]
pub struct FeaturedTrack {
    pub song_name: String,
    pub artist_name: String,
}

#[derive(Debug, SimpleObject)]
pub struct FeaturedPlaylist {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub songs: Vec<FeaturedTrack>,
}

impl From<services::FeaturedPlaylist> for FeaturedPlaylist {
    fn from(playlist: services::FeaturedPlaylist) -> Self {
        Self {
            id: playlist.id,
            name: playlist.name,
            avatar: playlist.avatar,
            songs: playlist
                .songs
                .into_iter()
                .map(|track| FeaturedTrack {
                    song_name: track.song_name,
                    artist_name: track.artist_name,
                })
                .collect(),
        }
    }
}

#[derive(Debug, SimpleObject)]
#[graphql(complex)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub avatar: Option<String>,
    pub created: String,
}

#[ComplexObject]
impl Artist {
    /// Songs of this artist
    async fn songs(
        &self,
        ctx: &Context<'_>,
        limit: Option<i64>,
        page: Option<i64>,
    ) -> Result<Vec<Song>> {
        let songs = songs_controller(ctx)
            .artist_songs(self.id, limit.unwrap_or(50), page.unwrap_or(0))
            .await
            .map_err(|e| e.extend())?;

        Ok(songs.into_iter().map(Song::from).collect())
    }
}

impl From<ArtistRecord> for Artist {
    fn from(record: ArtistRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            avatar: record.avatar,
            created: record.created,
        }
    }
}

#[derive(Debug, SimpleObject)]
#[graphql(complex)]
pub struct Song {
    pub id: i64,
    pub name: String,
    pub duration: i64,
    pub played: i64,
    pub created: String,
}

#[ComplexObject]
impl Song {
    /// Stored sources of this song
    async fn sources(&self, ctx: &Context<'_>) -> Result<Vec<SongSource>> {
        let sources = songs_controller(ctx)
            .song_sources_unchecked(self.id)
            .await
            .map_err(|e| e.extend())?;

        Ok(sources.into_iter().map(SongSource::from).collect())
    }

    /// The artist this song belongs to
    async fn artist(&self, ctx: &Context<'_>) -> Result<Option<Artist>> {
        let artist = artists_controller(ctx)
            .artist_by_song_unchecked(self.id)
            .await
            .map_err(|e| e.extend())?;

        Ok(artist.map(Artist::from))
    }
}

impl From<SongRecord> for Song {
    fn from(record: SongRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            duration: record.duration,
            played: record.played,
            created: record.created,
        }
    }
}

#[derive(Debug, SimpleObject)]
#[graphql(rename_fields = "snake_case")]
pub struct SongSource {
    pub song_id: Option<i64>,
    pub source_id: String,
    pub source_uri: String,
    pub provider_id: i64,
}

impl From<SongSourceRecord> for SongSource {
    fn from(record: SongSourceRecord) -> Self {
        Self {
            song_id: Some(record.song_id),
            source_id: record.source_id,
            source_uri: record.source_uri,
            provider_id: record.provider_id,
        }
    }
}

impl From<ResolvedSource> for SongSource {
    fn from(source: ResolvedSource) -> Self {
        Self {
            song_id: source.song_id,
            source_id: source.source_id,
            source_uri: source.source_uri,
            provider_id: source.provider_id,
        }
    }
}

#[derive(Debug, SimpleObject)]
#[graphql(complex)]
pub struct Playlist {
    pub id: i64,
    pub name: String,
    pub played: i64,
    pub avatar: Option<String>,
    pub created: String,
}

#[ComplexObject]
impl Playlist {
    /// Items of this playlist, newest first
    async fn items(
        &self,
        ctx: &Context<'_>,
        limit: Option<i64>,
        page: Option<i64>,
    ) -> Result<Vec<PlaylistItem>> {
        let items = playlists_controller(ctx)
            .playlist_items_unchecked(self.id, limit.unwrap_or(50), page.unwrap_or(0))
            .await
            .map_err(|e| e.extend())?;

        Ok(items.into_iter().map(PlaylistItem::from).collect())
    }
}

impl From<PlaylistRecord> for Playlist {
    fn from(record: PlaylistRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            played: record.played,
            avatar: record.avatar,
            created: record.created,
        }
    }
}

#[derive(Debug, SimpleObject)]
#[graphql(rename_fields = "snake_case")]
pub struct PlaylistItem {
    pub id: i64,
    pub song_id: Option<i64>,
    pub radio_id: Option<i64>,
    pub created: String,
    pub song: Option<Song>,
    pub radio: Option<Radio>,
}

impl From<PlaylistItemRecord> for PlaylistItem {
    fn from(record: PlaylistItemRecord) -> Self {
        Self {
            id: record.id,
            song_id: record.song_id,
            radio_id: record.radio_id,
            created: record.created,
            song: record.song.map(Song::from),
            radio: record.radio.map(Radio::from),
        }
    }
}

#[derive(Debug, SimpleObject)]
#[graphql(complex)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[ComplexObject]
impl Genre {
    /// The caller's songs tagged with this genre
    async fn songs(
        &self,
        ctx: &Context<'_>,
        limit: Option<i64>,
        page: Option<i64>,
    ) -> Result<Vec<Song>> {
        let account = ctx.account()?;
        let songs = songs_controller(ctx)
            .songs_by_genre(account.id, self.id, limit.unwrap_or(10), page.unwrap_or(0))
            .await
            .map_err(|e| e.extend())?;

        Ok(songs.into_iter().map(Song::from).collect())
    }
}

impl From<GenreRecord> for Genre {
    fn from(record: GenreRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
        }
    }
}

#[derive(Debug, SimpleObject)]
pub struct Provider {
    pub id: i64,
    pub name: String,
    #[graphql(name = "type")]
    pub kind: i64,
}

impl From<SongProviderRecord> for Provider {
    fn from(record: SongProviderRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            kind: record.kind,
        }
    }
}

#[derive(Debug, SimpleObject)]
pub struct SearchedSong {
    pub id: String,
    pub name: String,
    pub avatar: Option<String>,
}

#[derive(Debug, SimpleObject)]
pub struct ArtistSearch {
    pub name: String,
    pub avatar: Option<String>,
    pub songs: Vec<SearchedSong>,
}

#[derive(Debug, SimpleObject)]
pub struct ProviderSearchResult {
    pub id: i64,
    pub name: String,
    pub artist: ArtistSearch,
}

impl From<services::ProviderSearchResult> for ProviderSearchResult {
    fn from(result: services::ProviderSearchResult) -> Self {
        Self {
            id: result.id,
            name: result.name,
            artist: ArtistSearch {
                name: result.artist.name,
                avatar: result.artist.avatar,
                songs: result
                    .artist
                    .songs
                    .into_iter()
                    .map(|song| SearchedSong {
                        id: song.id,
                        name: song.name,
                        avatar: song.avatar,
                    })
                    .collect(),
            },
        }
    }
}
