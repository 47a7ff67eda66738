//! JSON API: the chat assistant and small UI helpers.

use axum::extract::{Path, State};
use axum::Json;
use book_bazaar_core::BookId;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::assistant::ChatReply;
use crate::error::AppError;
use crate::middleware::session;
use crate::middleware::RequireAuth;
use crate::models::Book;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct WishlistRequest {
    pub book_id: String,
}

#[derive(Debug, Serialize)]
pub struct WishlistResponse {
    pub added: bool,
    pub title: String,
    pub wishlist_count: u32,
}

#[derive(Debug, Serialize)]
pub struct CartCountResponse {
    pub count: u32,
}

/// Shopping assistant endpoint. Always answers: the model when it is
/// configured and cooperative, keyword rules otherwise.
pub async fn chatbot(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let books = state.store().books().list().await;
    let reply = state.assistant().respond(&request.message, &books).await;
    tracing::debug!(user = %user.email, source = ?reply.source, "chat reply");
    Ok(Json(reply))
}

/// Save a book to the wishlist from a chat reply action.
pub async fn add_to_wishlist(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    sess: Session,
    Json(request): Json<WishlistRequest>,
) -> Result<Json<WishlistResponse>, AppError> {
    let book_id = BookId::new(request.book_id);
    let book = state
        .store()
        .books()
        .find(&book_id)
        .await
        .ok_or(AppError::NotFound)?;

    let mut wishlist = session::load_wishlist(&sess).await?;
    let added = wishlist.add(book_id);
    session::save_wishlist(&sess, &wishlist).await?;

    Ok(Json(WishlistResponse {
        added,
        title: book.title,
        wishlist_count: wishlist.item_count(),
    }))
}

/// One catalog record as JSON.
pub async fn book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Book>, AppError> {
    let book = state
        .store()
        .books()
        .find(&BookId::new(id))
        .await
        .ok_or(AppError::NotFound)?;
    Ok(Json(book))
}

/// Cart badge count for the navbar.
pub async fn cart_count(
    RequireAuth(_user): RequireAuth,
    sess: Session,
) -> Result<Json<CartCountResponse>, AppError> {
    let cart = session::load_cart(&sess).await?;
    Ok(Json(CartCountResponse {
        count: cart.item_count(),
    }))
}
