//! Admin surfaces: accounts, catalog, orders, and analytics.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use axum::response::Redirect;
use axum::Form;
use book_bazaar_core::{BookId, Email, OrderId, OrderStatus, Role};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::{Address, Order, User};
use crate::services::checkout::CheckoutService;
use crate::state::AppState;
use crate::store::books::BookUpdate;

use super::orders::OrderSnapshotView;
use super::seller::{parse_price, BookForm, StatusForm};
use super::{redirect_with_error, redirect_with_success, BookView, Flash, PageContext};

/// One account row in the admin lists.
#[derive(Debug, Clone)]
pub struct AdminUserView {
    pub email: String,
    pub name: String,
    pub role: String,
    pub order_count: usize,
    pub listing_count: usize,
    pub joined: String,
}

impl AdminUserView {
    fn from_user(user: &User, listing_count: usize) -> Self {
        Self {
            email: user.email.to_string(),
            name: user.name.clone(),
            role: user.role.to_string(),
            order_count: user.orders.len(),
            listing_count,
            joined: user.created_at.format("%b %d, %Y").to_string(),
        }
    }
}

/// Build account rows, counting listings for sellers.
async fn account_rows(state: &AppState, accounts: &[User]) -> Vec<AdminUserView> {
    let mut rows = Vec::with_capacity(accounts.len());
    for user in accounts {
        let listing_count = if user.role == Role::Seller {
            state.store().books().list_by_seller(&user.email).await.len()
        } else {
            0
        };
        rows.push(AdminUserView::from_user(user, listing_count));
    }
    rows
}

/// One order record row in the admin lists.
#[derive(Debug, Clone)]
pub struct AdminOrderView {
    pub id: String,
    pub buyer: String,
    pub seller: String,
    pub placed_at: String,
    pub status: String,
    pub total: String,
}

impl From<&Order> for AdminOrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            buyer: order.buyer_email.to_string(),
            seller: order.seller_name.clone(),
            placed_at: order.created_at.format("%b %d, %Y").to_string(),
            status: order.status.to_string(),
            total: format!("${:.2}", order.total),
        }
    }
}

/// One bar of a histogram.
#[derive(Debug, Clone)]
pub struct HistogramRow {
    pub label: String,
    pub count: usize,
}

/// Admin dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin_dashboard.html")]
pub struct AdminDashboardTemplate {
    pub ctx: PageContext,
    pub user_count: usize,
    pub seller_count: usize,
    pub book_count: usize,
    pub order_count: usize,
    pub revenue: String,
    pub recent_orders: Vec<AdminOrderView>,
}

/// Account list template, shared by the all-users and sellers pages.
#[derive(Template, WebTemplate)]
#[template(path = "admin_users.html")]
pub struct AdminUsersTemplate {
    pub ctx: PageContext,
    pub title: String,
    pub users: Vec<AdminUserView>,
    pub q: String,
    pub role_filter: String,
    /// The sellers page is already role-scoped, so it hides the selector.
    pub show_role_filter: bool,
}

/// Account detail template.
#[derive(Template, WebTemplate)]
#[template(path = "admin_user_detail.html")]
pub struct AdminUserDetailTemplate {
    pub ctx: PageContext,
    pub account: AdminUserView,
    pub addresses: Vec<String>,
    pub orders: Vec<OrderSnapshotView>,
    pub listings: Vec<BookView>,
}

/// Catalog template.
#[derive(Template, WebTemplate)]
#[template(path = "admin_books.html")]
pub struct AdminBooksTemplate {
    pub ctx: PageContext,
    pub books: Vec<BookView>,
    pub genres: Vec<String>,
    pub q: String,
    pub genre_filter: String,
}

/// Listing edit template.
#[derive(Template, WebTemplate)]
#[template(path = "admin_book_edit.html")]
pub struct AdminBookEditTemplate {
    pub ctx: PageContext,
    pub book: BookView,
}

/// One purchased line in the admin order detail, with its id for the
/// remove action.
#[derive(Debug, Clone)]
pub struct AdminOrderItemView {
    pub book_id: String,
    pub title: String,
    pub author: String,
    pub quantity: u32,
    pub price: String,
    pub line_total: String,
}

/// Order record detail template.
#[derive(Template, WebTemplate)]
#[template(path = "admin_order_detail.html")]
pub struct AdminOrderDetailTemplate {
    pub ctx: PageContext,
    pub order: AdminOrderView,
    pub buyer_name: String,
    pub shipping_address: String,
    pub items: Vec<AdminOrderItemView>,
    pub statuses: Vec<String>,
}

/// Order list template.
#[derive(Template, WebTemplate)]
#[template(path = "admin_orders.html")]
pub struct AdminOrdersTemplate {
    pub ctx: PageContext,
    pub orders: Vec<AdminOrderView>,
    pub statuses: Vec<String>,
}

/// Analytics template.
#[derive(Template, WebTemplate)]
#[template(path = "admin_analytics.html")]
pub struct AdminAnalyticsTemplate {
    pub ctx: PageContext,
    pub revenue: String,
    pub average_order_value: String,
    pub orders_by_status: Vec<HistogramRow>,
    pub books_by_genre: Vec<HistogramRow>,
    pub recent_orders: Vec<AdminOrderView>,
}

/// Search and role filters for the account lists.
#[derive(Debug, Default, Deserialize)]
pub struct AccountFilter {
    pub q: Option<String>,
    pub role: Option<String>,
}

/// Search and genre filters for the catalog list.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogFilter {
    pub q: Option<String>,
    pub genre: Option<String>,
}

fn revenue_of(orders: &[Order]) -> Decimal {
    orders
        .iter()
        .filter(|o| o.status != OrderStatus::Cancelled)
        .map(|o| o.total)
        .sum()
}

/// Store overview.
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    sess: Session,
    Query(flash): Query<Flash>,
) -> Result<AdminDashboardTemplate, AppError> {
    let store = state.store();
    let orders = store.orders().list().await;
    let seller_count = store.users().list_by_role(Role::Seller).await.len();

    Ok(AdminDashboardTemplate {
        ctx: PageContext::load(Some(user), &sess, flash).await?,
        user_count: store.users().count().await,
        seller_count,
        book_count: store.books().count().await,
        order_count: orders.len(),
        revenue: format!("${:.2}", revenue_of(&orders)),
        recent_orders: orders.iter().take(5).map(AdminOrderView::from).collect(),
    })
}

fn retain_matching_accounts(accounts: &mut Vec<User>, filter: &AccountFilter) {
    if let Some(role) = filter.role.as_deref().and_then(|r| r.parse::<Role>().ok()) {
        accounts.retain(|u| u.role == role);
    }
    if let Some(q) = filter.q.as_deref() {
        let q = q.trim().to_lowercase();
        if !q.is_empty() {
            accounts.retain(|u| {
                u.name.to_lowercase().contains(&q) || u.email.as_str().to_lowercase().contains(&q)
            });
        }
    }
}

/// Every account, with optional role and name/email filters.
pub async fn users(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    sess: Session,
    Query(flash): Query<Flash>,
    Query(filter): Query<AccountFilter>,
) -> Result<AdminUsersTemplate, AppError> {
    let mut accounts = state.store().users().list().await;
    retain_matching_accounts(&mut accounts, &filter);

    Ok(AdminUsersTemplate {
        users: account_rows(&state, &accounts).await,
        ctx: PageContext::load(Some(user), &sess, flash).await?,
        title: "Users".to_owned(),
        q: filter.q.unwrap_or_default(),
        role_filter: filter.role.unwrap_or_default(),
        show_role_filter: true,
    })
}

/// Seller accounts only.
pub async fn sellers(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    sess: Session,
    Query(flash): Query<Flash>,
    Query(filter): Query<AccountFilter>,
) -> Result<AdminUsersTemplate, AppError> {
    let mut accounts = state.store().users().list_by_role(Role::Seller).await;
    let filter = AccountFilter {
        q: filter.q,
        role: None,
    };
    retain_matching_accounts(&mut accounts, &filter);

    Ok(AdminUsersTemplate {
        users: account_rows(&state, &accounts).await,
        ctx: PageContext::load(Some(user), &sess, flash).await?,
        title: "Sellers".to_owned(),
        q: filter.q.unwrap_or_default(),
        role_filter: String::new(),
        show_role_filter: false,
    })
}

/// One account in full: addresses, purchases, and listings if a seller.
pub async fn user_details(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    sess: Session,
    Path(email): Path<String>,
    Query(flash): Query<Flash>,
) -> Result<AdminUserDetailTemplate, AppError> {
    let email = Email::parse(&email).map_err(|e| AppError::Validation(e.to_string()))?;
    let account = state.store().users().get(&email).await?;

    let listings = if account.role == Role::Seller {
        state.store().books().list_by_seller(&account.email).await
    } else {
        Vec::new()
    };

    Ok(AdminUserDetailTemplate {
        ctx: PageContext::load(Some(user), &sess, flash).await?,
        account: AdminUserView::from_user(&account, listings.len()),
        addresses: account.addresses.iter().map(Address::summary).collect(),
        orders: account.orders.iter().map(OrderSnapshotView::from).collect(),
        listings: listings.iter().map(BookView::from).collect(),
    })
}

/// Remove an account. A seller's listings go with it.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(email): Path<String>,
) -> Result<Redirect, AppError> {
    let email = Email::parse(&email).map_err(|e| AppError::Validation(e.to_string()))?;
    if email == admin.email {
        return Ok(redirect_with_error(
            "/admin/users",
            "You cannot delete your own account",
        ));
    }

    let account = state.store().users().get(&email).await?;
    if account.role == Role::Seller {
        let removed = state.store().books().delete_by_seller(&email).await;
        tracing::info!(seller = %email, listings = removed, "seller listings removed");
    }
    state.store().users().delete(&email).await?;
    state.notifier().user_deleted(&email).await;

    tracing::info!(email = %email, "account deleted");
    Ok(redirect_with_success("/admin/users", "Account deleted"))
}

/// The whole catalog, with optional genre and title/author filters.
pub async fn books(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    sess: Session,
    Query(flash): Query<Flash>,
    Query(filter): Query<CatalogFilter>,
) -> Result<AdminBooksTemplate, AppError> {
    let mut catalog = state.store().books().list().await;
    let genres = state.store().books().genres().await;

    if let Some(genre) = filter.genre.as_deref() {
        if !genre.is_empty() {
            catalog.retain(|b| b.genre.eq_ignore_ascii_case(genre));
        }
    }
    if let Some(q) = filter.q.as_deref() {
        let q = q.trim().to_lowercase();
        if !q.is_empty() {
            catalog.retain(|b| {
                b.title.to_lowercase().contains(&q) || b.author.to_lowercase().contains(&q)
            });
        }
    }

    Ok(AdminBooksTemplate {
        ctx: PageContext::load(Some(user), &sess, flash).await?,
        books: catalog.iter().map(BookView::from).collect(),
        genres,
        q: filter.q.unwrap_or_default(),
        genre_filter: filter.genre.unwrap_or_default(),
    })
}

pub async fn edit_book_page(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    sess: Session,
    Path(id): Path<String>,
    Query(flash): Query<Flash>,
) -> Result<axum::response::Response, AppError> {
    use axum::response::IntoResponse;

    let Some(book) = state.store().books().find(&BookId::new(id)).await else {
        return Ok(redirect_with_error("/admin/books", "Listing not found").into_response());
    };
    Ok(AdminBookEditTemplate {
        ctx: PageContext::load(Some(user), &sess, flash).await?,
        book: BookView::from(&book),
    }
    .into_response())
}

/// Update any listing.
pub async fn edit_book(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
    Form(form): Form<BookForm>,
) -> Result<Redirect, AppError> {
    let book_id = BookId::new(id);
    let Some(book) = state.store().books().find(&book_id).await else {
        return Ok(redirect_with_error("/admin/books", "Listing not found"));
    };
    let price = match parse_price(&form.price) {
        Ok(price) => price,
        Err(message) => {
            return Ok(redirect_with_error(
                &format!("/admin/books/{book_id}/edit"),
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
    Ok(redirect_with_success("/admin/books", "Listing updated"))
}

/// Remove any listing.
pub async fn delete_book(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let book_id = BookId::new(id);
    let Some(book) = state.store().books().find(&book_id).await else {
        return Ok(redirect_with_error("/admin/books", "Listing not found"));
    };

    state.store().books().delete(&book_id).await?;
    state.notifier().book_deleted(&book).await;
    Ok(redirect_with_success("/admin/books", "Listing removed"))
}

/// Every order record in the store.
pub async fn orders(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    sess: Session,
    Query(flash): Query<Flash>,
) -> Result<AdminOrdersTemplate, AppError> {
    let records = state.store().orders().list().await;
    Ok(AdminOrdersTemplate {
        ctx: PageContext::load(Some(user), &sess, flash).await?,
        orders: records.iter().map(AdminOrderView::from).collect(),
        statuses: [
            OrderStatus::Placed,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ]
        .iter()
        .map(ToString::to_string)
        .collect(),
    })
}

/// One order record in full, with per-line remove actions.
pub async fn order_detail(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    sess: Session,
    Path(id): Path<String>,
    Query(flash): Query<Flash>,
) -> Result<AdminOrderDetailTemplate, AppError> {
    let record = state.store().orders().get(&OrderId::new(id)).await?;

    let items = record
        .items
        .iter()
        .map(|item| AdminOrderItemView {
            book_id: item.book_id.to_string(),
            title: item.title.clone(),
            author: item.author.clone(),
            quantity: item.quantity,
            price: format!("${:.2}", item.price),
            line_total: format!("${:.2}", item.line_total()),
        })
        .collect();

    Ok(AdminOrderDetailTemplate {
        ctx: PageContext::load(Some(user), &sess, flash).await?,
        order: AdminOrderView::from(&record),
        buyer_name: record.buyer_name.clone(),
        shipping_address: record.shipping_address.clone(),
        items,
        statuses: [
            OrderStatus::Placed,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ]
        .iter()
        .map(ToString::to_string)
        .collect(),
    })
}

/// Drop one line from an order record, recomputing its total and syncing
/// the buyer's snapshot.
pub async fn remove_order_item(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path((id, book_id)): Path<(String, String)>,
) -> Result<Redirect, AppError> {
    let order_id = OrderId::new(id);
    match CheckoutService::new(state.store())
        .remove_order_item(&order_id, &BookId::new(book_id))
        .await
    {
        Ok(updated) => Ok(redirect_with_success(
            &format!("/admin/orders/{order_id}"),
            &format!("Line removed. New total ${:.2}", updated.total),
        )),
        Err(_) => Ok(redirect_with_error(
            &format!("/admin/orders/{order_id}"),
            "Line not found",
        )),
    }
}

/// Override any order's status, syncing the buyer's snapshot.
pub async fn update_order_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect, AppError> {
    let Ok(status) = form.status.parse::<OrderStatus>() else {
        return Ok(redirect_with_error("/admin/orders", "Unknown status"));
    };

    let order_id = OrderId::new(id);
    match CheckoutService::new(state.store())
        .update_order_status(&order_id, status)
        .await
    {
        Ok(updated) => {
            state.notifier().order_status_changed(&updated).await;
            Ok(redirect_with_success(
                "/admin/orders",
                &format!("Order {} is now {status}", updated.id),
            ))
        }
        Err(_) => Ok(redirect_with_error("/admin/orders", "Order not found")),
    }
}

/// Revenue and histogram views over the whole store.
pub async fn analytics(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    sess: Session,
    Query(flash): Query<Flash>,
) -> Result<AdminAnalyticsTemplate, AppError> {
    let records = state.store().orders().list().await;
    let catalog = state.store().books().list().await;

    let revenue = revenue_of(&records);
    let billable = records
        .iter()
        .filter(|o| o.status != OrderStatus::Cancelled)
        .count();
    let average_order_value = if billable == 0 {
        Decimal::ZERO
    } else {
        revenue / Decimal::from(billable)
    };

    let mut orders_by_status: Vec<HistogramRow> = [
        OrderStatus::Placed,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ]
    .iter()
    .map(|status| HistogramRow {
        label: status.to_string(),
        count: records.iter().filter(|o| o.status == *status).count(),
    })
    .collect();
    orders_by_status.retain(|row| row.count > 0);

    let mut books_by_genre: Vec<HistogramRow> = Vec::new();
    for book in &catalog {
        if let Some(row) = books_by_genre.iter_mut().find(|r| r.label == book.genre) {
            row.count += 1;
        } else {
            books_by_genre.push(HistogramRow {
                label: book.genre.clone(),
                count: 1,
            });
        }
    }
    books_by_genre.sort_by(|a, b| b.count.cmp(&a.count));

    Ok(AdminAnalyticsTemplate {
        ctx: PageContext::load(Some(user), &sess, flash).await?,
        revenue: format!("${revenue:.2}"),
        average_order_value: format!("${average_order_value:.2}"),
        orders_by_status,
        books_by_genre,
        recent_orders: records.iter().take(5).map(AdminOrderView::from).collect(),
    })
}
