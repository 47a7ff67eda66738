//! Cookie session layer and typed access to session state.

use tower_sessions::cookie::time::Duration;
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::{CurrentUser, SessionCart, SessionWishlist};

/// Keys under which session values are stored.
pub mod session_keys {
    /// The signed-in user ([`crate::models::CurrentUser`]).
    pub const CURRENT_USER: &str = "bookbazaar.user";
    /// The shopping cart ([`crate::models::SessionCart`]).
    pub const CART: &str = "bookbazaar.cart";
    /// The wishlist ([`crate::models::SessionWishlist`]).
    pub const WISHLIST: &str = "bookbazaar.wishlist";
}

/// Session layer: in-memory backing store, 7-day inactivity expiry,
/// `Lax` cookies that are secure only behind HTTPS.
pub fn create_session_layer(config: &AppConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name("bookbazaar_session")
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_secure(config.use_secure_cookies())
        .with_expiry(Expiry::OnInactivity(Duration::days(7)))
}

/// Read the cart, defaulting to empty.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn load_cart(session: &Session) -> Result<SessionCart, AppError> {
    Ok(session
        .get::<SessionCart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Write the cart back to the session.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn save_cart(session: &Session, cart: &SessionCart) -> Result<(), AppError> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

/// Read the wishlist, defaulting to empty.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn load_wishlist(session: &Session) -> Result<SessionWishlist, AppError> {
    Ok(session
        .get::<SessionWishlist>(session_keys::WISHLIST)
        .await?
        .unwrap_or_default())
}

/// Write the wishlist back to the session.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn save_wishlist(session: &Session, wishlist: &SessionWishlist) -> Result<(), AppError> {
    session.insert(session_keys::WISHLIST, wishlist).await?;
    Ok(())
}

/// Store the signed-in user, cycling the session id against fixation.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn sign_in(session: &Session, user: &CurrentUser) -> Result<(), AppError> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await?;
    Ok(())
}

/// Drop everything: user, cart, and wishlist.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn sign_out(session: &Session) -> Result<(), AppError> {
    session.flush().await?;
    Ok(())
}
