//! Mixtape backend - music aggregator service
//!
//! This is the main entry point for the Mixtape backend API.
//! All operations are exposed via GraphQL at /graphql.

mod config;
mod controller;
mod db;
mod error;
mod graphql;
mod services;
mod validators;

use std::net::SocketAddr;
use std::sync::Arc;

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::Router;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::response::IntoResponse;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;
use crate::graphql::{BearerHeader, MixtapeSchema};
use crate::services::{FeaturedCharts, MusicResolver, TtlCache, YoutubeClient};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub schema: MixtapeSchema,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(Config::from_env()?);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mixtape=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Mixtape backend");

    let db = Database::connect(&config.database_url).await?;
    db::schema::init(db.pool()).await?;
    tracing::info!("Database ready");

    // Caches are owned here and handed to the services that memoize
    // through them; their lifetime is the process lifetime.
    let stream_cache = Arc::new(TtlCache::new());
    let search_cache = Arc::new(TtlCache::new());
    let chart_cache = Arc::new(TtlCache::new());

    let youtube = Arc::new(YoutubeClient::new(stream_cache, search_cache));
    let resolver = Arc::new(MusicResolver::new(db.clone(), config.clone(), youtube));
    let charts = Arc::new(FeaturedCharts::new(chart_cache));

    let schema = graphql::build_schema(db, config.clone(), resolver, charts);
    tracing::info!("GraphQL schema built");

    let app = Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { schema });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);
    tracing::info!(
        "GraphQL playground: http://localhost:{}/graphql",
        config.port
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// GraphQL query/mutation handler; the raw Authorization header rides along
/// so resolvers can decode it per operation.
async fn graphql_handler(
    axum::extract::State(state): axum::extract::State<AppState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);

    let request = req.into_inner().data(BearerHeader(header));

    state.schema.execute(request).await.into()
}

/// GraphiQL interactive playground
async fn graphiql() -> impl IntoResponse {
    axum::response::Html(GraphiQLSource::build().endpoint("/graphql").finish())
}
