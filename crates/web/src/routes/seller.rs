//! Seller dashboard: listings and received orders.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use axum::response::Redirect;
use axum::Form;
use book_bazaar_core::{BookId, OrderId, OrderStatus};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireSeller;
use crate::models::{Book, NewBook, Order};
use crate::services::checkout::CheckoutService;
use crate::state::AppState;
use crate::store::books::BookUpdate;

use super::orders::OrderItemView;
use super::{redirect_with_error, redirect_with_success, BookView, Flash, PageContext};

/// One received order in the seller views.
#[derive(Debug, Clone)]
pub struct SellerOrderView {
    pub id: String,
    pub buyer_name: String,
    pub placed_at: String,
    pub status: String,
    pub total: String,
    pub shipping_address: String,
    pub items: Vec<OrderItemView>,
    /// Statuses this record can move to next.
    pub next_statuses: Vec<String>,
}

impl From<&Order> for SellerOrderView {
    fn from(order: &Order) -> Self {
        let next_statuses = match order.status {
            OrderStatus::Placed => vec!["Shipped".to_owned(), "Cancelled".to_owned()],
            OrderStatus::Shipped => vec!["Delivered".to_owned(), "Cancelled".to_owned()],
            OrderStatus::Delivered | OrderStatus::Cancelled => Vec::new(),
        };
        Self {
            id: order.id.to_string(),
            buyer_name: order.buyer_name.clone(),
            placed_at: order.created_at.format("%b %d, %Y").to_string(),
            status: order.status.to_string(),
            total: format!("${:.2}", order.total),
            shipping_address: order.shipping_address.clone(),
            items: order.items.iter().map(OrderItemView::from).collect(),
            next_statuses,
        }
    }
}

/// Seller dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "seller_dashboard.html")]
pub struct SellerDashboardTemplate {
    pub ctx: PageContext,
    pub listing_count: usize,
    pub pending_orders: usize,
    pub revenue: String,
    pub recent_orders: Vec<SellerOrderView>,
}

/// Seller listings template.
#[derive(Template, WebTemplate)]
#[template(path = "seller_books.html")]
pub struct SellerBooksTemplate {
    pub ctx: PageContext,
    pub books: Vec<BookView>,
}

/// New listing form template.
#[derive(Template, WebTemplate)]
#[template(path = "seller_add_book.html")]
pub struct AddBookTemplate {
    pub ctx: PageContext,
}

/// Edit listing form template.
#[derive(Template, WebTemplate)]
#[template(path = "seller_edit_book.html")]
pub struct EditBookTemplate {
    pub ctx: PageContext,
    pub book: BookView,
}

/// Received orders template.
#[derive(Template, WebTemplate)]
#[template(path = "seller_orders.html")]
pub struct SellerOrdersTemplate {
    pub ctx: PageContext,
    pub orders: Vec<SellerOrderView>,
}

#[derive(Debug, Deserialize)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub price: String,
    pub genre: String,
    pub summary: Option<String>,
    pub cover_url: Option<String>,
    pub stock: u32,
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

pub(super) fn parse_price(raw: &str) -> Result<Decimal, String> {
    let price: Decimal = raw
        .trim()
        .trim_start_matches('$')
        .parse()
        .map_err(|_| "Price must be a number".to_owned())?;
    if price < Decimal::ZERO {
        return Err("Price cannot be negative".to_owned());
    }
    Ok(price)
}

/// A listing the signed-in seller owns, or a flash redirect.
async fn owned_book(
    state: &AppState,
    seller_email: &book_bazaar_core::Email,
    id: &BookId,
) -> Result<Book, Redirect> {
    match state.store().books().find(id).await {
        Some(book) if book.seller_email == *seller_email => Ok(book),
        Some(_) => Err(redirect_with_error(
            "/seller/books",
            "You can only manage your own listings",
        )),
        None => Err(redirect_with_error("/seller/books", "Listing not found")),
    }
}

/// Seller dashboard with headline numbers and latest orders.
pub async fn dashboard(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    sess: Session,
    Query(flash): Query<Flash>,
) -> Result<SellerDashboardTemplate, AppError> {
    let listings = state.store().books().list_by_seller(&user.email).await;
    let orders = state.store().orders().list_by_seller(&user.email).await;

    let pending_orders = orders
        .iter()
        .filter(|o| o.status == OrderStatus::Placed)
        .count();
    let revenue: Decimal = orders
        .iter()
        .filter(|o| o.status != OrderStatus::Cancelled)
        .map(|o| o.total)
        .sum();
    let recent_orders = orders.iter().take(5).map(SellerOrderView::from).collect();

    Ok(SellerDashboardTemplate {
        ctx: PageContext::load(Some(user), &sess, flash).await?,
        listing_count: listings.len(),
        pending_orders,
        revenue: format!("${revenue:.2}"),
        recent_orders,
    })
}

/// The seller's own listings.
pub async fn books(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    sess: Session,
    Query(flash): Query<Flash>,
) -> Result<SellerBooksTemplate, AppError> {
    let listings = state.store().books().list_by_seller(&user.email).await;
    Ok(SellerBooksTemplate {
        ctx: PageContext::load(Some(user), &sess, flash).await?,
        books: listings.iter().map(BookView::from).collect(),
    })
}

pub async fn add_book_page(
    RequireSeller(user): RequireSeller,
    sess: Session,
    Query(flash): Query<Flash>,
) -> Result<AddBookTemplate, AppError> {
    Ok(AddBookTemplate {
        ctx: PageContext::load(Some(user), &sess, flash).await?,
    })
}

/// Create a listing owned by the signed-in seller.
pub async fn add_book(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    Form(form): Form<BookForm>,
) -> Result<Redirect, AppError> {
    if form.title.trim().is_empty() || form.author.trim().is_empty() {
        return Ok(redirect_with_error(
            "/seller/books/add",
            "Title and author are required",
        ));
    }
    let price = match parse_price(&form.price) {
        Ok(price) => price,
        Err(message) => return Ok(redirect_with_error("/seller/books/add", &message)),
    };

    let book = state
        .store()
        .books()
        .insert(
            NewBook {
                title: form.title.trim().to_owned(),
                author: form.author.trim().to_owned(),
                price,
                genre: form.genre.trim().to_owned(),
                summary: form.summary.unwrap_or_default().trim().to_owned(),
                cover_url: form.cover_url,
                stock: form.stock,
                seller_name: user.name.clone(),
                seller_email: user.email,
            }
            .into_book(),
        )
        .await;

    state.notifier().book_listed(&book).await;
    tracing::info!(book_id = %book.id, title = %book.title, "listing created");
    Ok(redirect_with_success(
        "/seller/books",
        &format!("\"{}\" is now listed", book.title),
    ))
}

pub async fn edit_book_page(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    sess: Session,
    Path(id): Path<String>,
    Query(flash): Query<Flash>,
) -> Result<axum::response::Response, AppError> {
    use axum::response::IntoResponse;

    let book = match owned_book(&state, &user.email, &BookId::new(id)).await {
        Ok(book) => book,
        Err(redirect) => return Ok(redirect.into_response()),
    };
    Ok(EditBookTemplate {
        ctx: PageContext::load(Some(user), &sess, flash).await?,
        book: BookView::from(&book),
    }
    .into_response())
}

/// Update a listing the seller owns.
pub async fn edit_book(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    Path(id): Path<String>,
    Form(form): Form<BookForm>,
) -> Result<Redirect, AppError> {
    let book_id = BookId::new(id);
    let book = match owned_book(&state, &user.email, &book_id).await {
        Ok(book) => book,
        Err(redirect) => return Ok(redirect),
    };
    let price = match parse_price(&form.price) {
        Ok(price) => price,
        Err(message) => {
            return Ok(redirect_with_error(
                &format!("/seller/books/{book_id}/edit"),
                &message,
            ));
        }
    };

    let cover_url = match form.cover_url {
        Some(url) if !url.trim().is_empty() => url.trim().to_owned(),
        _ => book.cover_url,
    };
    let updated = state
        .store()
        .books()
        .update(
            &book_id,
            BookUpdate {
                title: form.title.trim().to_owned(),
                author: form.author.trim().to_owned(),
                price,
                genre: form.genre.trim().to_owned(),
                summary: form.summary.unwrap_or_default().trim().to_owned(),
                cover_url,
                stock: form.stock,
            },
        )
        .await?;

    state.notifier().book_updated(&updated).await;
    Ok(redirect_with_success("/seller/books", "Listing updated"))
}

/// Delete a listing the seller owns.
pub async fn delete_book(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let book_id = BookId::new(id);
    let book = match owned_book(&state, &user.email, &book_id).await {
        Ok(book) => book,
        Err(redirect) => return Ok(redirect),
    };

    state.store().books().delete(&book_id).await?;
    state.notifier().book_deleted(&book).await;
    tracing::info!(book_id = %book_id, title = %book.title, "listing removed");
    Ok(redirect_with_success(
        "/seller/books",
        &format!("\"{}\" removed", book.title),
    ))
}

/// Orders addressed to this seller.
pub async fn orders(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    sess: Session,
    Query(flash): Query<Flash>,
) -> Result<SellerOrdersTemplate, AppError> {
    let records = state.store().orders().list_by_seller(&user.email).await;
    Ok(SellerOrdersTemplate {
        ctx: PageContext::load(Some(user), &sess, flash).await?,
        orders: records.iter().map(SellerOrderView::from).collect(),
    })
}

/// Move one of this seller's orders to a new status. The buyer's snapshot
/// is synced by the checkout service.
pub async fn update_order_status(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    Path(id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect, AppError> {
    let order_id = OrderId::new(id);
    let Some(order) = state.store().orders().find(&order_id).await else {
        return Ok(redirect_with_error("/seller/orders", "Order not found"));
    };
    if order.seller_email != user.email {
        return Ok(redirect_with_error(
            "/seller/orders",
            "You can only manage your own orders",
        ));
    }

    let Ok(status) = form.status.parse::<OrderStatus>() else {
        return Ok(redirect_with_error("/seller/orders", "Unknown status"));
    };

    let updated = CheckoutService::new(state.store())
        .update_order_status(&order_id, status)
        .await?;
    state.notifier().order_status_changed(&updated).await;

    Ok(redirect_with_success(
        "/seller/orders",
        &format!("Order {} is now {status}", updated.id),
    ))
}
