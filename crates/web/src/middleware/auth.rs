//! Auth extractors.
//!
//! Handlers declare the access they need in their signature: [`RequireAuth`]
//! for any signed-in user, [`RequireSeller`] and [`RequireAdmin`] for role
//! gates, [`OptionalAuth`] for pages that render either way. Browser
//! requests bounce to the login page; `/api/` requests get a JSON error.

use axum::extract::{FromRequestParts, OriginalUri};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use book_bazaar_core::Role;
use tower_sessions::Session;

use crate::middleware::session_keys;
use crate::models::CurrentUser;

/// Rejection for the auth extractors.
#[derive(Debug)]
pub enum AuthRejection {
    /// Browser request without a user: redirect to login, preserving the
    /// page they wanted.
    RedirectToLogin { next: String },
    /// API request without a user.
    Unauthorized,
    /// Signed in, wrong role.
    Forbidden,
    /// The session layer is missing or failed.
    SessionUnavailable,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin { next } => {
                let target = format!("/login?next={}", urlencoding::encode(&next));
                Redirect::to(&target).into_response()
            }
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "error": "Please log in first" })),
            )
                .into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                "You don't have access to this page",
            )
                .into_response(),
            Self::SessionUnavailable => {
                tracing::error!("session layer missing or unavailable");
                (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong").into_response()
            }
        }
    }
}

async fn current_user(parts: &mut Parts) -> Result<Option<CurrentUser>, AuthRejection> {
    let session = parts
        .extensions
        .get::<Session>()
        .cloned()
        .ok_or(AuthRejection::SessionUnavailable)?;
    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .map_err(|_| AuthRejection::SessionUnavailable)
}

fn missing_user_rejection(parts: &Parts) -> AuthRejection {
    // Nested routers strip their mount prefix from `parts.uri`; the path the
    // client actually requested lives in the `OriginalUri` extension.
    let uri = parts
        .extensions
        .get::<OriginalUri>()
        .map_or(&parts.uri, |original| &original.0);
    let path = uri.path();
    if path.starts_with("/api/") {
        AuthRejection::Unauthorized
    } else {
        let next = uri
            .path_and_query()
            .map_or_else(|| path.to_owned(), ToString::to_string);
        AuthRejection::RedirectToLogin { next }
    }
}

/// Extracts the signed-in user or rejects.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match current_user(parts).await? {
            Some(user) => Ok(Self(user)),
            None => Err(missing_user_rejection(parts)),
        }
    }
}

/// Extracts the signed-in user if there is one.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(current_user(parts).await?))
    }
}

/// Extracts a signed-in seller. Admins do not pass; each surface is
/// scoped to exactly one role.
#[derive(Debug, Clone)]
pub struct RequireSeller(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireSeller
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match current_user(parts).await? {
            Some(user) if user.role == Role::Seller => Ok(Self(user)),
            Some(_) => Err(AuthRejection::Forbidden),
            None => Err(missing_user_rejection(parts)),
        }
    }
}

/// Extracts a signed-in admin.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match current_user(parts).await? {
            Some(user) if user.role == Role::Admin => Ok(Self(user)),
            Some(_) => Err(AuthRejection::Forbidden),
            None => Err(missing_user_rejection(parts)),
        }
    }
}
