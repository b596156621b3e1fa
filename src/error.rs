//! Domain error taxonomy
//!
//! One closed enum for every failure a controller can surface. Infrastructure
//! errors are logged at the controller boundary and re-signaled as `Internal`
//! with a generic message; the original cause never reaches the API layer.

use async_graphql::ErrorExtensions;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Precondition violated (length, format). Safe to expose verbatim.
    #[error("{message}")]
    InvalidArgument {
        field: &'static str,
        message: String,
    },

    /// Ownership/authorization check failed. Reported without detail.
    #[error("Forbidden")]
    Forbidden,

    /// Duplicate email on registration.
    #[error("Account already exists")]
    AlreadyExists { field: &'static str },

    /// Expired bearer token, distinct so clients can re-authenticate.
    #[error("Login required")]
    TokenExpired,

    /// Catch-all for store/network failures.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// The generic wrapper used at controller boundaries.
    pub fn internal() -> Self {
        Self::Internal("Unexpected service error".to_string())
    }

    /// Field path reported to the API client alongside the message.
    pub fn field_path(&self) -> &'static str {
        match self {
            AppError::InvalidArgument { field, .. } => field,
            AppError::AlreadyExists { field } => field,
            AppError::TokenExpired => "token_validity",
            AppError::Forbidden | AppError::Internal(_) => "server",
        }
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string())
            .extend_with(|_, e| e.set("field", self.field_path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_paths() {
        let invalid = AppError::InvalidArgument {
            field: "name",
            message: "name must have 1 characters".into(),
        };
        assert_eq!(invalid.field_path(), "name");
        assert_eq!(AppError::AlreadyExists { field: "email" }.field_path(), "email");
        assert_eq!(AppError::TokenExpired.field_path(), "token_validity");
        assert_eq!(AppError::Forbidden.field_path(), "server");
        assert_eq!(AppError::internal().field_path(), "server");
    }

    #[test]
    fn internal_message_is_generic() {
        assert_eq!(AppError::internal().to_string(), "Unexpected service error");
    }
}
