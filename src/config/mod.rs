//! Application configuration management

use std::env;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// SQLite database URL or path
    pub database_url: String,

    /// JWT signing secret
    pub jwt_secret: String,

    /// Account id used for anonymous logins
    pub default_account_id: i64,

    /// Base URL for device-backed song providers
    pub device_provider_url: String,

    /// API key appended to device-provider stream URLs
    pub api_key: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // JWT_SECRET should be set explicitly in production; fall back to a
        // random per-process secret for development.
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            use std::collections::hash_map::DefaultHasher;
            use std::hash::{Hash, Hasher};
            let mut hasher = DefaultHasher::new();
            std::time::SystemTime::now().hash(&mut hasher);
            format!("dev-secret-{}", hasher.finish())
        });

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .context("Invalid PORT")?,

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://./data/mixtape.db".to_string()),

            jwt_secret,

            default_account_id: env::var("DEFAULT_ACCOUNT_ID")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .context("Invalid DEFAULT_ACCOUNT_ID")?,

            device_provider_url: env::var("DEVICE_PROVIDER_URL")
                .unwrap_or_else(|_| "http://localhost:9900/stream/".to_string()),

            api_key: env::var("PROVIDER_API_KEY").unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_env() {
        // Only assert on keys this test does not set; the suite runs in one
        // process so unrelated env vars must be left alone.
        let config = Config::from_env().unwrap();
        assert_eq!(config.default_account_id, 1);
        assert!(config.device_provider_url.ends_with('/'));
    }
}
