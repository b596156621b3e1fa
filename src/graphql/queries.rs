//! Query root

use async_graphql::{Context, ErrorExtensions, Object, Result};

use super::auth::AuthExt;
use super::helpers::*;
use super::types::*;

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// The caller's artists; by id, by name search, or paginated.
    async fn artists(
        &self,
        ctx: &Context<'_>,
        id: Option<i64>,
        name: Option<String>,
        limit: Option<i64>,
        page: Option<i64>,
    ) -> Result<Vec<Artist>> {
        let account = ctx.account()?;
        let controller = artists_controller(ctx);
        let (limit, page) = (limit.unwrap_or(10), page.unwrap_or(0));

        let records = if let Some(id) = id {
            controller.artist_by_id(account.id, id).await
        } else if let Some(name) = name {
            controller.artists_by_name(account.id, &name, limit, page).await
        } else {
            controller.all_artists(account.id, limit, page).await
        }
        .map_err(|e| e.extend())?;

        Ok(records.into_iter().map(Artist::from).collect())
    }

    /// The caller's devices.
    async fn devices(
        &self,
        ctx: &Context<'_>,
        limit: Option<i64>,
        page: Option<i64>,
    ) -> Result<Vec<Device>> {
        let account = ctx.account()?;
        let records = devices_controller(ctx)
            .all_devices(account.id, limit.unwrap_or(10), page.unwrap_or(0))
            .await
            .map_err(|e| e.extend())?;

        Ok(records.into_iter().map(Device::from).collect())
    }

    /// Commands for the caller's devices newer than the given id.
    async fn commands(&self, ctx: &Context<'_>, since: i64) -> Result<Vec<DeviceCommand>> {
        let account = ctx.account()?;
        let records = device_commands_controller(ctx)
            .commands_since(account.id, since)
            .await
            .map_err(|e| e.extend())?;

        Ok(records.into_iter().map(DeviceCommand::from).collect())
    }

    /// Scraped regional charts; all of them, or one by id.
    async fn featured_playlists(
        &self,
        ctx: &Context<'_>,
        id: Option<String>,
    ) -> Result<Vec<FeaturedPlaylist>> {
        let controller = playlists_controller(ctx);

        let playlists = match id {
            Some(id) => controller.featured_playlist_by_id(&id).await,
            None => controller.featured_playlists().await,
        }
        .map_err(|e| e.extend())?;

        Ok(playlists.into_iter().map(FeaturedPlaylist::from).collect())
    }

    /// The caller's playlists; by id, by name search, or paginated.
    async fn playlists(
        &self,
        ctx: &Context<'_>,
        id: Option<i64>,
        name: Option<String>,
        limit: Option<i64>,
        page: Option<i64>,
    ) -> Result<Vec<Playlist>> {
        let account = ctx.account()?;
        let controller = playlists_controller(ctx);
        let (limit, page) = (limit.unwrap_or(10), page.unwrap_or(0));

        let records = if let Some(id) = id {
            controller.playlist_by_id(account.id, id).await
        } else if let Some(name) = name {
            controller
                .playlists_by_name(account.id, &name, limit, page)
                .await
        } else {
            controller.all_playlists(account.id, limit, page).await
        }
        .map_err(|e| e.extend())?;

        Ok(records.into_iter().map(Playlist::from).collect())
    }

    /// The caller's radios.
    async fn radios(
        &self,
        ctx: &Context<'_>,
        limit: Option<i64>,
        page: Option<i64>,
    ) -> Result<Vec<Radio>> {
        let account = ctx.account()?;
        let records = radios_controller(ctx)
            .all_radios(account.id, limit.unwrap_or(10), page.unwrap_or(0))
            .await
            .map_err(|e| e.extend())?;

        Ok(records.into_iter().map(Radio::from).collect())
    }

    /// All genres.
    async fn genres(
        &self,
        ctx: &Context<'_>,
        limit: Option<i64>,
        page: Option<i64>,
    ) -> Result<Vec<Genre>> {
        let records = genres_controller(ctx)
            .all_genres(limit.unwrap_or(10), page.unwrap_or(0))
            .await
            .map_err(|e| e.extend())?;

        Ok(records.into_iter().map(Genre::from).collect())
    }

    /// Sources of an owned song, resolved to playable URIs.
    async fn song_sources(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "songId")] song_id: i64,
    ) -> Result<Vec<SongSource>> {
        let account = ctx.account()?;
        let sources = songs_controller(ctx)
            .all_song_sources(account.id, song_id)
            .await
            .map_err(|e| e.extend())?;

        Ok(sources.into_iter().map(SongSource::from).collect())
    }

    /// Provider-suggested playlists for an artist.
    async fn playlist_search(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "artistName")] artist_name: Option<String>,
    ) -> Result<Vec<ProviderSearchResult>> {
        let results = music_resolver(ctx)
            .search_playlists(artist_name.as_deref().unwrap_or_default())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error searching provider playlists");
                crate::error::AppError::internal().extend()
            })?;

        Ok(results.into_iter().map(ProviderSearchResult::from).collect())
    }

    /// Organic provider search.
    async fn organic_search(&self, ctx: &Context<'_>, q: String) -> Result<Vec<ProviderSearchResult>> {
        let results = music_resolver(ctx).organic_search(&q).await.map_err(|e| {
            tracing::error!(error = %e, "Error searching providers");
            crate::error::AppError::internal().extend()
        })?;

        Ok(results.into_iter().map(ProviderSearchResult::from).collect())
    }

    /// The caller's songs, newest first.
    async fn recent_songs(
        &self,
        ctx: &Context<'_>,
        limit: Option<i64>,
        page: Option<i64>,
    ) -> Result<Vec<Song>> {
        let account = ctx.account()?;
        let records = songs_controller(ctx)
            .all_songs(account.id, limit.unwrap_or(10), page.unwrap_or(0))
            .await
            .map_err(|e| e.extend())?;

        Ok(records.into_iter().map(Song::from).collect())
    }

    /// The caller's songs matching a name search.
    async fn search_songs(
        &self,
        ctx: &Context<'_>,
        name: String,
        limit: Option<i64>,
        page: Option<i64>,
    ) -> Result<Vec<Song>> {
        let account = ctx.account()?;
        let records = songs_controller(ctx)
            .search_songs_by_name(account.id, &name, limit.unwrap_or(10), page.unwrap_or(0))
            .await
            .map_err(|e| e.extend())?;

        Ok(records.into_iter().map(Song::from).collect())
    }

    /// Providers visible to the caller.
    async fn providers(
        &self,
        ctx: &Context<'_>,
        limit: Option<i64>,
        page: Option<i64>,
    ) -> Result<Vec<Provider>> {
        let account = ctx.account()?;
        let records = songs_controller(ctx)
            .song_providers(account.id, limit.unwrap_or(10), page.unwrap_or(0))
            .await
            .map_err(|e| e.extend())?;

        Ok(records.into_iter().map(Provider::from).collect())
    }

    /// Resolve an ad-hoc (provider, source) pair to a playable URI.
    async fn song_provider_stream(
        &self,
        ctx: &Context<'_>,
        id: i64,
        #[graphql(name = "source_id")] source_id: String,
    ) -> Result<SongSource> {
        let account = ctx.account()?;
        let source = songs_controller(ctx)
            .resolve_source_by_id(account.id, id, &source_id)
            .await
            .map_err(|e| e.extend())?;

        Ok(SongSource::from(source))
    }

    /// Authenticate with email and password.
    async fn login(&self, ctx: &Context<'_>, email: String, password: String) -> Result<Auth> {
        let token = account_controller(ctx)
            .login_user(&email, &password)
            .await
            .map_err(|e| e.extend())?;

        Ok(Auth::from(token))
    }

    /// Token for the configured default account, no credentials required.
    async fn anon_login(&self, ctx: &Context<'_>) -> Result<Auth> {
        let token = account_controller(ctx)
            .anon_login()
            .map_err(|e| e.extend())?;

        Ok(Auth::from(token))
    }
}
