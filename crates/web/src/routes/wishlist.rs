//! Wishlist pages and actions. Stored in the session, like the cart.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use axum::response::Redirect;
use axum::Form;
use book_bazaar_core::BookId;
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::AppError;
use crate::filters;
use crate::middleware::session;
use crate::middleware::RequireAuth;
use crate::state::AppState;

use super::{redirect_with_error, redirect_with_success, BookView, Flash, PageContext};

/// Wishlist page template.
#[derive(Template, WebTemplate)]
#[template(path = "wishlist.html")]
pub struct WishlistTemplate {
    pub ctx: PageContext,
    pub books: Vec<BookView>,
}

#[derive(Debug, Deserialize)]
pub struct WishlistForm {
    pub book_id: String,
}

/// Wishlist page.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    sess: Session,
    Query(flash): Query<Flash>,
) -> Result<WishlistTemplate, AppError> {
    let wishlist = session::load_wishlist(&sess).await?;
    let mut books = Vec::with_capacity(wishlist.book_ids.len());
    for id in &wishlist.book_ids {
        if let Some(book) = state.store().books().find(id).await {
            books.push(BookView::from(&book));
        }
    }

    Ok(WishlistTemplate {
        ctx: PageContext::load(Some(user), &sess, flash).await?,
        books,
    })
}

/// Save a book to the wishlist.
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    sess: Session,
    Form(form): Form<WishlistForm>,
) -> Result<Redirect, AppError> {
    let book_id = BookId::new(form.book_id);
    let Some(book) = state.store().books().find(&book_id).await else {
        return Ok(redirect_with_error("/", "That book is no longer available"));
    };

    let mut wishlist = session::load_wishlist(&sess).await?;
    let added = wishlist.add(book_id);
    session::save_wishlist(&sess, &wishlist).await?;

    let message = if added {
        format!("Saved \"{}\" to your wishlist", book.title)
    } else {
        format!("\"{}\" is already on your wishlist", book.title)
    };
    Ok(redirect_with_success("/wishlist", &message))
}

/// Remove a book from the wishlist.
pub async fn remove(
    RequireAuth(_user): RequireAuth,
    sess: Session,
    Form(form): Form<WishlistForm>,
) -> Result<Redirect, AppError> {
    let mut wishlist = session::load_wishlist(&sess).await?;
    wishlist.remove(&BookId::new(form.book_id));
    session::save_wishlist(&sess, &wishlist).await?;
    Ok(Redirect::to("/wishlist"))
}

/// Move a saved book into the cart.
pub async fn move_to_cart(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    sess: Session,
    Form(form): Form<WishlistForm>,
) -> Result<Redirect, AppError> {
    let book_id = BookId::new(form.book_id);
    let Some(book) = state.store().books().find(&book_id).await else {
        return Ok(redirect_with_error(
            "/wishlist",
            "That book is no longer available",
        ));
    };
    if !book.in_stock() {
        return Ok(redirect_with_error("/wishlist", "This book is out of stock"));
    }

    let mut wishlist = session::load_wishlist(&sess).await?;
    wishlist.remove(&book_id);
    session::save_wishlist(&sess, &wishlist).await?;

    let mut cart = session::load_cart(&sess).await?;
    cart.add(book_id, 1);
    session::save_cart(&sess, &cart).await?;

    Ok(redirect_with_success(
        "/cart",
        &format!("Moved \"{}\" to your cart", book.title),
    ))
}
