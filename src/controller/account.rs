//! Account controller: login, registration, anonymous access.

use std::sync::Arc;

use crate::config::Config;
use crate::db::{AccountRecord, Database};
use crate::error::AppError;
use crate::services::auth::{self, AuthToken, TokenData};
use crate::validators::validate_email_and_password;

const ANON_REGION: &str = "se_pt";

pub struct AccountController {
    db: Database,
    config: Arc<Config>,
}

impl AccountController {
    pub fn new(db: Database, config: Arc<Config>) -> Self {
        Self { db, config }
    }

    /// Verify credentials and mint a token for the account.
    pub async fn login_user(&self, email: &str, password: &str) -> Result<AuthToken, AppError> {
        validate_email_and_password(email, password)?;

        let account = self.db.accounts().get_by_email(email).await.map_err(|e| {
            tracing::error!(error = %e, "Error getting account by email");
            AppError::internal()
        })?;

        if let Some(account) = account {
            let same = auth::verify_password(&account.password, password).map_err(|e| {
                tracing::error!(error = %e, "Error comparing account password");
                AppError::internal()
            })?;

            if same {
                return auth::create_token(
                    &self.config,
                    TokenData {
                        id: account.id,
                        region: None,
                    },
                    None,
                )
                .map_err(|e| {
                    tracing::error!(error = %e, "Error signing token");
                    AppError::internal()
                });
            }
        }

        Err(AppError::Internal(
            "Email or password do not match".to_string(),
        ))
    }

    /// Create a new account. A duplicate email is its own error kind so the
    /// API layer can point at the field.
    pub async fn register_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AccountRecord, AppError> {
        validate_email_and_password(email, password)?;

        let hashed = auth::hash_password(password).map_err(|e| {
            tracing::error!(error = %e, "Error creating hashed password");
            AppError::internal()
        })?;

        self.db
            .accounts()
            .insert(email, &hashed)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::AlreadyExists { field: "email" }
                } else {
                    tracing::error!(error = %e, "Error saving account");
                    AppError::internal()
                }
            })
    }

    /// Token for the configured default account, no credential check.
    pub fn anon_login(&self) -> Result<AuthToken, AppError> {
        auth::create_token(
            &self.config,
            TokenData {
                id: self.config.default_account_id,
                region: Some(ANON_REGION.to_string()),
            },
            None,
        )
        .map_err(|e| {
            tracing::error!(error = %e, "Error signing anonymous token");
            AppError::internal()
        })
    }
}

fn is_unique_violation(error: &anyhow::Error) -> bool {
    matches!(
        error.downcast_ref::<sqlx::Error>(),
        Some(sqlx::Error::Database(db)) if db.is_unique_violation()
    )
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::controller::testing::test_config;
    use crate::db::testing::{empty_db, memory_db};
    use crate::services::auth::decode_token;

    #[tokio::test]
    async fn register_then_login() {
        let db = memory_db().await;
        let controller = AccountController::new(db, test_config());

        let account = controller
            .register_user("a@x.com", "secret1")
            .await
            .unwrap();
        assert_eq!(account.email, "a@x.com");
        assert!(account.id > 0);

        let token = controller.login_user("a@x.com", "secret1").await.unwrap();
        assert_eq!(token.scheme, "bearer");

        let data = decode_token(&test_config(), &format!("Bearer {}", token.token)).unwrap();
        assert_eq!(data.id, account.id);
    }

    #[tokio::test]
    async fn duplicate_email_is_distinct_error() {
        let db = memory_db().await;
        let controller = AccountController::new(db, test_config());

        controller
            .register_user("a@x.com", "secret1")
            .await
            .unwrap();
        assert_matches!(
            controller.register_user("a@x.com", "secret2").await,
            Err(AppError::AlreadyExists { field: "email" })
        );
    }

    #[tokio::test]
    async fn wrong_password_rejected() {
        let db = memory_db().await;
        let controller = AccountController::new(db, test_config());

        controller
            .register_user("a@x.com", "secret1")
            .await
            .unwrap();
        assert_matches!(
            controller.login_user("a@x.com", "nope-nope").await,
            Err(AppError::Internal(message)) if message == "Email or password do not match"
        );
    }

    #[tokio::test]
    async fn unknown_email_rejected_like_wrong_password() {
        let db = memory_db().await;
        let controller = AccountController::new(db, test_config());

        assert_matches!(
            controller.login_user("ghost@x.com", "secret1").await,
            Err(AppError::Internal(message)) if message == "Email or password do not match"
        );
    }

    #[tokio::test]
    async fn validation_runs_before_any_query() {
        // No tables exist; a repository call would surface Internal.
        let db = empty_db().await;
        let controller = AccountController::new(db, test_config());

        assert_matches!(
            controller.register_user("not-an-email", "secret1").await,
            Err(AppError::InvalidArgument { field: "email", .. })
        );
        assert_matches!(
            controller.login_user("a@x.com", "1234").await,
            Err(AppError::InvalidArgument { field: "password", .. })
        );
    }

    #[tokio::test]
    async fn anon_login_uses_default_account() {
        let db = memory_db().await;
        let controller = AccountController::new(db, test_config());

        let token = controller.anon_login().unwrap();
        let data = decode_token(&test_config(), &format!("Bearer {}", token.token)).unwrap();
        assert_eq!(data.id, 1);
        assert_eq!(data.region.as_deref(), Some("se_pt"));
    }
}
