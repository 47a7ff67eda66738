//! Authentication errors.

use axum::http::StatusCode;
use book_bazaar_core::EmailError;

/// Errors raised by signup and login.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Wrong email or password. Deliberately indistinguishable so login
    /// does not reveal which accounts exist.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Signup with an email that already has an account.
    #[error("An account with this email already exists")]
    EmailTaken,

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Password must be at least {min} characters", min = super::MIN_PASSWORD_LENGTH)]
    PasswordTooShort,

    /// Hashing or hash parsing failed. The detail stays in the logs.
    #[error("Password hashing failed")]
    Hashing(#[source] argon2::password_hash::Error),
}

impl AuthError {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::EmailTaken => StatusCode::CONFLICT,
            Self::InvalidEmail(_) | Self::PasswordTooShort => StatusCode::BAD_REQUEST,
            Self::Hashing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
