//! GraphQL request authentication
//!
//! The HTTP layer captures the raw Authorization header; resolvers decode it
//! on demand so an expired token surfaces per-operation with its distinct
//! error kind.

use std::sync::Arc;

use async_graphql::{Context, ErrorExtensions, Result};

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::{TokenData, decode_token};

/// Raw Authorization header passed in from the HTTP handler.
#[derive(Debug, Clone, Default)]
pub struct BearerHeader(pub Option<String>);

/// Extension trait resolving the calling account from the request token.
pub trait AuthExt {
    fn account(&self) -> Result<TokenData>;
}

impl AuthExt for Context<'_> {
    fn account(&self) -> Result<TokenData> {
        let config = self.data_unchecked::<Arc<Config>>();
        let header = self
            .data_opt::<BearerHeader>()
            .and_then(|h| h.0.as_deref())
            .ok_or_else(|| {
                AppError::Internal("Authorization header not provided".to_string()).extend()
            })?;

        decode_token(config, header).map_err(|e| e.extend())
    }
}
