//! Controller construction from GraphQL context data

use std::sync::Arc;

use async_graphql::Context;

use crate::config::Config;
use crate::controller::{
    AccountController, ArtistsController, DeviceCommandsController, DevicesController,
    GenresController, PlaylistsController, RadiosController, SongsController,
};
use crate::db::Database;
use crate::services::{FeaturedCharts, MusicResolver};

pub fn account_controller(ctx: &Context<'_>) -> AccountController {
    AccountController::new(
        ctx.data_unchecked::<Database>().clone(),
        ctx.data_unchecked::<Arc<Config>>().clone(),
    )
}

pub fn artists_controller(ctx: &Context<'_>) -> ArtistsController {
    ArtistsController::new(ctx.data_unchecked::<Database>().clone())
}

pub fn songs_controller(ctx: &Context<'_>) -> SongsController {
    SongsController::new(
        ctx.data_unchecked::<Database>().clone(),
        ctx.data_unchecked::<Arc<MusicResolver>>().clone(),
    )
}

pub fn playlists_controller(ctx: &Context<'_>) -> PlaylistsController {
    PlaylistsController::new(
        ctx.data_unchecked::<Database>().clone(),
        ctx.data_unchecked::<Arc<FeaturedCharts>>().clone(),
    )
}

pub fn radios_controller(ctx: &Context<'_>) -> RadiosController {
    RadiosController::new(ctx.data_unchecked::<Database>().clone())
}

pub fn devices_controller(ctx: &Context<'_>) -> DevicesController {
    DevicesController::new(ctx.data_unchecked::<Database>().clone())
}

pub fn device_commands_controller(ctx: &Context<'_>) -> DeviceCommandsController {
    DeviceCommandsController::new(ctx.data_unchecked::<Database>().clone())
}

pub fn genres_controller(ctx: &Context<'_>) -> GenresController {
    GenresController::new(ctx.data_unchecked::<Database>().clone())
}

pub fn music_resolver(ctx: &Context<'_>) -> Arc<MusicResolver> {
    ctx.data_unchecked::<Arc<MusicResolver>>().clone()
}
