//! GraphQL API
//!
//! The single API surface of the backend. Every resolver delegates to a
//! controller after resolving the caller's account from the bearer token;
//! login, anonymous login and registration are the only unauthenticated
//! operations.

pub mod auth;
pub mod helpers;
pub mod mutations;
pub mod queries;
pub mod types;

use std::sync::Arc;

use async_graphql::{EmptySubscription, Schema};

use crate::config::Config;
use crate::db::Database;
use crate::services::{FeaturedCharts, MusicResolver};

pub use auth::BearerHeader;
pub use mutations::MutationRoot;
pub use queries::QueryRoot;

/// The GraphQL schema type
pub type MixtapeSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the GraphQL schema with all resolvers
pub fn build_schema(
    db: Database,
    config: Arc<Config>,
    resolver: Arc<MusicResolver>,
    charts: Arc<FeaturedCharts>,
) -> MixtapeSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(db)
        .data(config)
        .data(resolver)
        .data(charts)
        .finish()
}
