//! Token issuing and password hashing
//!
//! Tokens are HS256 JWTs carrying the account id (and an optional region
//! tag) under a `data` claim. An expired token is a distinct failure kind so
//! clients can silently re-authenticate; every other verification failure is
//! generic.

use chrono::Utc;
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::AppError;

const TOKEN_SCHEME: &str = "bearer";
const BEARER_PREFIX: &str = "Bearer ";
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 86_400;
const BCRYPT_COST: u32 = 10;

/// Payload carried inside a signed token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenData {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    exp: i64,
    data: TokenData,
}

/// Minted token handed back to the client.
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub scheme: String,
    pub token: String,
    pub expires: i64,
}

/// Sign a token; default expiry is one day from now.
pub fn create_token(
    config: &Config,
    data: TokenData,
    expires_at: Option<i64>,
) -> Result<AuthToken, AppError> {
    let expires = expires_at.unwrap_or_else(|| Utc::now().timestamp() + DEFAULT_TOKEN_LIFETIME_SECS);
    let claims = Claims { exp: expires, data };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(AuthToken {
        scheme: TOKEN_SCHEME.to_string(),
        token,
        expires,
    })
}

/// Verify a bearer header ("Bearer <token>") and return its payload.
pub fn decode_token(config: &Config, header: &str) -> Result<TokenData, AppError> {
    let token = header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Internal("Authorization header not provided".to_string()))?;

    let mut validation = Validation::default();
    validation.leeway = 0;

    match decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    ) {
        Ok(data) => Ok(data.claims.data),
        Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => Err(AppError::TokenExpired),
        Err(e) => Err(AppError::Internal(e.to_string())),
    }
}

/// Hash a password with a generated salt.
pub fn hash_password(plain: &str) -> Result<String, AppError> {
    bcrypt::hash(plain, BCRYPT_COST).map_err(|e| AppError::Internal(e.to_string()))
}

/// Compare a stored hash with a plain-text candidate.
pub fn verify_password(hashed: &str, plain: &str) -> Result<bool, AppError> {
    bcrypt::verify(plain, hashed).map_err(|e| AppError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn test_config(secret: &str) -> Config {
        Config {
            port: 0,
            database_url: String::new(),
            jwt_secret: secret.to_string(),
            default_account_id: 1,
            device_provider_url: "http://localhost:9900/stream/".to_string(),
            api_key: "k".to_string(),
        }
    }

    #[test]
    fn token_round_trip() {
        let config = test_config("round-trip-secret");
        let minted = create_token(
            &config,
            TokenData {
                id: 42,
                region: Some("se_pt".to_string()),
            },
            None,
        )
        .unwrap();

        assert_eq!(minted.scheme, "bearer");

        let data = decode_token(&config, &format!("Bearer {}", minted.token)).unwrap();
        assert_eq!(data.id, 42);
        assert_eq!(data.region.as_deref(), Some("se_pt"));
    }

    #[test]
    fn expired_token_is_distinct() {
        let config = test_config("expiry-secret");
        let minted = create_token(
            &config,
            TokenData { id: 1, region: None },
            Some(Utc::now().timestamp() - 1),
        )
        .unwrap();

        assert_matches!(
            decode_token(&config, &format!("Bearer {}", minted.token)),
            Err(AppError::TokenExpired)
        );
    }

    #[test]
    fn wrong_secret_is_generic_failure() {
        let config = test_config("signing-secret");
        let minted = create_token(&config, TokenData { id: 1, region: None }, None).unwrap();

        let other = test_config("different-secret");
        assert_matches!(
            decode_token(&other, &format!("Bearer {}", minted.token)),
            Err(AppError::Internal(_))
        );
    }

    #[test]
    fn header_without_bearer_prefix_rejected() {
        let config = test_config("prefix-secret");
        assert_matches!(decode_token(&config, "Basic abc"), Err(AppError::Internal(_)));
        assert_matches!(decode_token(&config, "Bearer "), Err(AppError::Internal(_)));
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("secret1").unwrap();
        assert!(verify_password(&hash, "secret1").unwrap());
        assert!(!verify_password(&hash, "secret2").unwrap());
    }
}
