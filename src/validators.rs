//! Input validation
//!
//! Chainable precondition checks over a (value, field) pair. Checks run
//! synchronously before any repository call and fail fast with
//! `AppError::InvalidArgument` naming the offending field.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::error::AppError;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^[^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*@([a-zA-Z0-9-]+\.)+[a-zA-Z]{2,}$"#)
        .expect("email regex is valid")
});

#[derive(Debug)]
pub struct Validator<'a> {
    value: &'a str,
    field: &'static str,
}

impl<'a> Validator<'a> {
    pub fn new(value: &'a str, field: &'static str) -> Self {
        Self { value, field }
    }

    pub fn min_length(self, min: usize) -> Result<Self, AppError> {
        if self.value.chars().count() >= min {
            Ok(self)
        } else {
            Err(AppError::InvalidArgument {
                field: self.field,
                message: format!("{} must have {} characters", self.field, min),
            })
        }
    }

    pub fn max_length(self, max: usize) -> Result<Self, AppError> {
        if self.value.chars().count() <= max {
            Ok(self)
        } else {
            Err(AppError::InvalidArgument {
                field: self.field,
                message: format!("{} exceeds {} maximum length", self.field, max),
            })
        }
    }

    pub fn is_email(self) -> Result<Self, AppError> {
        if EMAIL_REGEX.is_match(&self.value.to_lowercase()) {
            Ok(self)
        } else {
            Err(AppError::InvalidArgument {
                field: "email",
                message: "Invalid email address".to_string(),
            })
        }
    }

    pub fn is_valid_url(self) -> Result<Self, AppError> {
        match Url::parse(self.value) {
            Ok(_) => Ok(self),
            Err(_) => Err(AppError::InvalidArgument {
                field: self.field,
                message: format!("{} is not a valid url", self.field),
            }),
        }
    }
}

/// Email at most 100 chars and RFC-ish; password 5-100 chars.
pub fn validate_email_and_password(email: &str, password: &str) -> Result<(), AppError> {
    Validator::new(email, "email").max_length(100)?.is_email()?;
    Validator::new(password, "password")
        .min_length(5)?
        .max_length(100)?;
    Ok(())
}

/// Avatar URL: 1-300 chars, must parse as a URL.
pub fn validate_avatar(avatar: &str) -> Result<(), AppError> {
    Validator::new(avatar, "avatar")
        .min_length(1)?
        .max_length(300)?
        .is_valid_url()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::error::AppError;

    #[test]
    fn accepts_reasonable_emails() {
        for email in ["a@x.com", "first.last@sub.example.org", "UPPER@CASE.NET"] {
            assert!(validate_email_and_password(email, "secret1").is_ok(), "{email}");
        }
    }

    #[test]
    fn rejects_malformed_emails() {
        for email in ["", "plain", "no@tld", "two@@x.com", "spa ce@x.com"] {
            assert_matches!(
                validate_email_and_password(email, "secret1"),
                Err(AppError::InvalidArgument { field: "email", .. }),
                "{email}"
            );
        }
    }

    #[test]
    fn rejects_email_over_100_chars() {
        let email = format!("{}@example.com", "a".repeat(100));
        assert_matches!(
            validate_email_and_password(&email, "secret1"),
            Err(AppError::InvalidArgument { field: "email", .. })
        );
    }

    #[test]
    fn password_bounds() {
        assert_matches!(
            validate_email_and_password("a@x.com", "1234"),
            Err(AppError::InvalidArgument { field: "password", .. })
        );
        assert!(validate_email_and_password("a@x.com", "12345").is_ok());
        assert_matches!(
            validate_email_and_password("a@x.com", &"p".repeat(101)),
            Err(AppError::InvalidArgument { field: "password", .. })
        );
    }

    #[test]
    fn avatar_must_be_url() {
        assert!(validate_avatar("https://cdn.example.com/a.png").is_ok());
        assert_matches!(
            validate_avatar(""),
            Err(AppError::InvalidArgument { field: "avatar", .. })
        );
        assert_matches!(
            validate_avatar("not a url"),
            Err(AppError::InvalidArgument { field: "avatar", .. })
        );
        let long = format!("https://cdn.example.com/{}", "x".repeat(300));
        assert_matches!(
            validate_avatar(&long),
            Err(AppError::InvalidArgument { field: "avatar", .. })
        );
    }

    #[test]
    fn name_length_chain() {
        assert!(Validator::new("ok", "name").min_length(1).and_then(|v| v.max_length(100)).is_ok());
        assert_matches!(
            Validator::new("", "name").min_length(1),
            Err(AppError::InvalidArgument { field: "name", .. })
        );
    }
}
