//! Account signup and login.
//!
//! Passwords are hashed with Argon2id and stored as PHC strings. Login
//! verifies against the stored hash and never reports whether the email or
//! the password was wrong.

mod error;

pub use error::AuthError;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use book_bazaar_core::{Email, Role};

use crate::models::{NewUser, User};
use crate::store::{RepositoryError, Store};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Signup and login against the user table.
pub struct AuthService<'a> {
    store: &'a Store,
}

impl<'a> AuthService<'a> {
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is malformed or taken, or the password
    /// is too short.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::PasswordTooShort);
        }

        let password_hash = hash_password(password)?;
        let new_user = NewUser {
            email,
            name: name.trim().to_owned(),
            password_hash,
            role,
        };

        match self.store.users().create(new_user).await {
            Ok(user) => {
                tracing::info!(email = %user.email, role = %user.role, "account created");
                Ok(user)
            }
            Err(RepositoryError::Conflict) => Err(AuthError::EmailTaken),
            Err(err) => {
                tracing::error!(error = %err, "signup failed");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Verify credentials and return the account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] when the email is unknown,
    /// malformed, or the password does not match.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let Ok(email) = Email::parse(email) else {
            return Err(AuthError::InvalidCredentials);
        };
        let Some(user) = self.store.users().find_by_email(&email).await else {
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(&user.password_hash, password)?;
        tracing::info!(email = %user.email, "login succeeded");
        Ok(user)
    }
}

/// Hash a password into a PHC string.
///
/// # Errors
///
/// Returns [`AuthError::Hashing`] if the hasher fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(AuthError::Hashing)
}

fn verify_password(stored_hash: &str, password: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(stored_hash).map_err(AuthError::Hashing)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_signup_then_login() {
        let store = Store::new();
        let auth = AuthService::new(&store);

        auth.signup("Ada", "ada@example.com", "hunter22", Role::Customer)
            .await
            .unwrap();

        let user = auth.login("ada@example.com", "hunter22").await.unwrap();
        assert_eq!(user.name, "Ada");
        assert_eq!(user.role, Role::Customer);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let store = Store::new();
        let auth = AuthService::new(&store);
        auth.signup("Ada", "ada@example.com", "hunter22", Role::Customer)
            .await
            .unwrap();

        let err = auth.login("ada@example.com", "wrong-pass").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let store = Store::new();
        let auth = AuthService::new(&store);
        let err = auth.login("ghost@example.com", "whatever").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_signup_duplicate_email() {
        let store = Store::new();
        let auth = AuthService::new(&store);
        auth.signup("Ada", "ada@example.com", "hunter22", Role::Customer)
            .await
            .unwrap();

        let err = auth
            .signup("Ada Again", "ada@example.com", "hunter22", Role::Customer)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn test_signup_short_password() {
        let store = Store::new();
        let auth = AuthService::new(&store);

        // Seven characters is one short of the minimum.
        let err = auth
            .signup("Ada", "ada@example.com", "hunter2", Role::Customer)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::PasswordTooShort));

        assert!(auth
            .signup("Ada", "ada@example.com", "hunter22", Role::Customer)
            .await
            .is_ok());
    }

    #[test]
    fn test_hash_is_not_plaintext() {
        let hash = hash_password("hunter22").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(!hash.contains("hunter22"));
    }
}
