//! Cart pages and actions. The cart itself lives in the session.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use axum::response::Redirect;
use axum::Form;
use book_bazaar_core::BookId;
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::AppError;
use crate::filters;
use crate::middleware::session;
use crate::middleware::RequireAuth;
use crate::models::SessionCart;
use crate::state::AppState;

use super::{redirect_with_error, redirect_with_success, Flash, PageContext};

/// Cart line display data.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub book_id: String,
    pub title: String,
    pub author: String,
    pub cover_url: String,
    pub quantity: u32,
    pub stock: u32,
    pub price: Decimal,
    pub line_total: Decimal,
}

/// Cart display data.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: Decimal,
    pub item_count: u32,
}

impl CartView {
    /// Resolve session lines against the catalog. Lines whose book has
    /// been delisted are silently dropped.
    pub async fn resolve(state: &AppState, cart: &SessionCart) -> Self {
        let mut items = Vec::with_capacity(cart.lines.len());
        let mut subtotal = Decimal::ZERO;
        let mut item_count = 0;

        for line in &cart.lines {
            let Some(book) = state.store().books().find(&line.book_id).await else {
                continue;
            };
            let line_total = book.price * Decimal::from(line.quantity);
            subtotal += line_total;
            item_count += line.quantity;
            items.push(CartItemView {
                book_id: book.id.to_string(),
                title: book.title,
                author: book.author,
                cover_url: book.cover_url,
                quantity: line.quantity,
                stock: book.stock,
                price: book.price,
                line_total,
            });
        }

        Self {
            items,
            subtotal,
            item_count,
        }
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub ctx: PageContext,
    pub cart: CartView,
}

#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub book_id: String,
    pub quantity: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub book_id: String,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub book_id: String,
}

/// Cart page.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    sess: Session,
    Query(flash): Query<Flash>,
) -> Result<CartTemplate, AppError> {
    let cart = session::load_cart(&sess).await?;
    Ok(CartTemplate {
        ctx: PageContext::load(Some(user), &sess, flash).await?,
        cart: CartView::resolve(&state, &cart).await,
    })
}

/// Add a book to the cart.
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    sess: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect, AppError> {
    let book_id = BookId::new(form.book_id);
    let Some(book) = state.store().books().find(&book_id).await else {
        return Ok(redirect_with_error("/", "That book is no longer available"));
    };
    if !book.in_stock() {
        return Ok(redirect_with_error(
            &format!("/books/{book_id}"),
            "This book is out of stock",
        ));
    }

    let quantity = form.quantity.unwrap_or(1).max(1);
    let mut cart = session::load_cart(&sess).await?;
    cart.add(book_id, quantity);
    session::save_cart(&sess, &cart).await?;

    Ok(redirect_with_success(
        "/cart",
        &format!("Added \"{}\" to your cart", book.title),
    ))
}

/// Change a line quantity. Zero removes the line.
pub async fn update(
    RequireAuth(_user): RequireAuth,
    sess: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Redirect, AppError> {
    let mut cart = session::load_cart(&sess).await?;
    cart.set_quantity(&BookId::new(form.book_id), form.quantity);
    session::save_cart(&sess, &cart).await?;
    Ok(Redirect::to("/cart"))
}

/// Remove a line.
pub async fn remove(
    RequireAuth(_user): RequireAuth,
    sess: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Redirect, AppError> {
    let mut cart = session::load_cart(&sess).await?;
    cart.remove(&BookId::new(form.book_id));
    session::save_cart(&sess, &cart).await?;
    Ok(Redirect::to("/cart"))
}
