//! Mutation root

use async_graphql::{Context, ErrorExtensions, Object, Result};

use super::auth::AuthExt;
use super::helpers::*;
use super::types::*;

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Create an artist under the caller's account.
    async fn add_artist(&self, ctx: &Context<'_>, name: String, avatar: String) -> Result<Artist> {
        let account = ctx.account()?;
        let record = artists_controller(ctx)
            .new_artist(account.id, &name, &avatar)
            .await
            .map_err(|e| e.extend())?;

        Ok(Artist::from(record))
    }

    async fn update_artist(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "artistId")] artist_id: i64,
        name: String,
        avatar: String,
    ) -> Result<bool> {
        let account = ctx.account()?;
        artists_controller(ctx)
            .update_artist(account.id, artist_id, &name, &avatar)
            .await
            .map_err(|e| e.extend())
    }

    async fn delete_artist(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "artistId")] artist_id: i64,
    ) -> Result<bool> {
        let account = ctx.account()?;
        artists_controller(ctx)
            .remove_artist(account.id, artist_id)
            .await
            .map_err(|e| e.extend())
    }

    /// Create a radio under the caller's account.
    async fn add_radio(
        &self,
        ctx: &Context<'_>,
        name: String,
        stream: String,
        avatar: String,
    ) -> Result<Radio> {
        let account = ctx.account()?;
        let record = radios_controller(ctx)
            .new_radio(account.id, &name, &stream, &avatar)
            .await
            .map_err(|e| e.extend())?;

        Ok(Radio::from(record))
    }

    async fn update_radio(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "radioId")] radio_id: i64,
        name: String,
        stream: String,
        avatar: String,
    ) -> Result<bool> {
        let account = ctx.account()?;
        radios_controller(ctx)
            .update_radio(account.id, radio_id, &name, &stream, &avatar)
            .await
            .map_err(|e| e.extend())
    }

    async fn delete_radio(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "radioId")] radio_id: i64,
    ) -> Result<bool> {
        let account = ctx.account()?;
        radios_controller(ctx)
            .delete_radio(account.id, radio_id)
            .await
            .map_err(|e| e.extend())
    }

    /// Create a song under an artist the caller owns.
    async fn add_song(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "artistId")] artist_id: i64,
        name: String,
    ) -> Result<Song> {
        let account = ctx.account()?;
        let record = songs_controller(ctx)
            .new_song(account.id, artist_id, &name)
            .await
            .map_err(|e| e.extend())?;

        Ok(Song::from(record))
    }

    async fn edit_song(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "songId")] song_id: i64,
        name: String,
    ) -> Result<bool> {
        let account = ctx.account()?;
        songs_controller(ctx)
            .update_song(account.id, song_id, &name)
            .await
            .map_err(|e| e.extend())
    }

    async fn delete_song(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "songId")] song_id: i64,
    ) -> Result<bool> {
        let account = ctx.account()?;
        songs_controller(ctx)
            .delete_song(account.id, song_id)
            .await
            .map_err(|e| e.extend())
    }

    /// Attach a provider source to an owned song.
    async fn add_song_source(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "providerId")] provider_id: i64,
        #[graphql(name = "songId")] song_id: i64,
        #[graphql(name = "sourceId")] source_id: String,
        #[graphql(name = "sourceUri")] source_uri: Option<String>,
    ) -> Result<bool> {
        let account = ctx.account()?;
        songs_controller(ctx)
            .insert_song_source(
                account.id,
                provider_id,
                song_id,
                &source_id,
                source_uri.as_deref().unwrap_or_default(),
            )
            .await
            .map_err(|e| e.extend())
    }

    /// Count one play of an owned song.
    async fn music_played(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "songId")] song_id: i64,
    ) -> Result<bool> {
        let account = ctx.account()?;
        songs_controller(ctx)
            .increment_played_song(account.id, song_id)
            .await
            .map_err(|e| e.extend())
    }

    /// Create a playlist under the caller's account.
    async fn add_playlist(
        &self,
        ctx: &Context<'_>,
        name: String,
        avatar: String,
    ) -> Result<Playlist> {
        let account = ctx.account()?;
        let record = playlists_controller(ctx)
            .new_playlist(account.id, &name, &avatar)
            .await
            .map_err(|e| e.extend())?;

        Ok(Playlist::from(record))
    }

    async fn edit_playlist(
        &self,
        ctx: &Context<'_>,
        id: i64,
        name: String,
        avatar: String,
    ) -> Result<bool> {
        let account = ctx.account()?;
        playlists_controller(ctx)
            .update_playlist(account.id, id, &name, &avatar)
            .await
            .map_err(|e| e.extend())
    }

    async fn delete_playlist(&self, ctx: &Context<'_>, id: i64) -> Result<bool> {
        let account = ctx.account()?;
        playlists_controller(ctx)
            .delete_playlist(account.id, id)
            .await
            .map_err(|e| e.extend())
    }

    /// Remove an item from one of the caller's playlists.
    async fn remove_item_from_playlist(&self, ctx: &Context<'_>, id: i64) -> Result<bool> {
        let account = ctx.account()?;
        playlists_controller(ctx)
            .remove_from_playlist(account.id, id)
            .await
            .map_err(|e| e.extend())
    }

    /// Add an owned song to an owned playlist.
    async fn save_playlist_song(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "playlistId")] playlist_id: i64,
        #[graphql(name = "songId")] song_id: i64,
    ) -> Result<bool> {
        let account = ctx.account()?;
        playlists_controller(ctx)
            .insert_playlist_song(account.id, playlist_id, song_id)
            .await
            .map_err(|e| e.extend())
    }

    /// Get-or-create a device, optionally registering it as a provider.
    async fn create_or_get_device(
        &self,
        ctx: &Context<'_>,
        name: String,
        provider: Option<bool>,
    ) -> Result<Device> {
        let account = ctx.account()?;
        let record = devices_controller(ctx)
            .upsert_device(account.id, &name, provider.unwrap_or(false))
            .await
            .map_err(|e| e.extend())?;

        Ok(Device::from(record))
    }

    async fn update_device_state(
        &self,
        ctx: &Context<'_>,
        id: i64,
        #[graphql(name = "is_online")] is_online: bool,
        #[graphql(name = "is_playing")] is_playing: bool,
    ) -> Result<bool> {
        let account = ctx.account()?;
        devices_controller(ctx)
            .update_device_state(account.id, id, is_online, is_playing)
            .await
            .map_err(|e| e.extend())
    }

    /// Acknowledge a command targeted at one of the caller's devices.
    async fn acknowledge_command(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "commandId")] command_id: i64,
    ) -> Result<bool> {
        let account = ctx.account()?;
        devices_controller(ctx)
            .command_acknowledge(account.id, command_id)
            .await
            .map_err(|e| e.extend())
    }

    /// Register a new account. No token required.
    async fn register_account(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
    ) -> Result<Account> {
        let record = account_controller(ctx)
            .register_user(&email, &password)
            .await
            .map_err(|e| e.extend())?;

        Ok(Account::from(record))
    }
}
