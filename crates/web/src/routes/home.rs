//! Catalog pages and the role-aware dashboard.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use book_bazaar_core::{BookId, Role};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::AppError;
use crate::filters;
use crate::middleware::session;
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::Book;
use crate::state::AppState;

use super::orders::OrderSnapshotView;
use super::{BookView, Flash, PageContext};

/// Health check endpoint.
pub async fn health() -> &'static str {
    "OK"
}

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub q: Option<String>,
    pub genre: Option<String>,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub ctx: PageContext,
    pub books: Vec<BookView>,
    pub genres: Vec<String>,
    pub q: String,
    pub genre: String,
}

/// Book detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "book_detail.html")]
pub struct BookDetailTemplate {
    pub ctx: PageContext,
    pub book: BookView,
    pub in_wishlist: bool,
}

/// Customer dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub ctx: PageContext,
    pub orders: Vec<OrderSnapshotView>,
    pub picks: Vec<BookView>,
}

/// Catalog home with optional search and genre filter.
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    sess: Session,
    Query(query): Query<CatalogQuery>,
    Query(flash): Query<Flash>,
) -> Result<IndexTemplate, AppError> {
    let repo = state.store().books();
    let q = query.q.unwrap_or_default();
    let genre = query.genre.unwrap_or_default();

    let mut books = if q.trim().is_empty() {
        repo.list().await
    } else {
        repo.search(&q).await
    };
    if !genre.is_empty() {
        books.retain(|b| b.genre == genre);
    }

    Ok(IndexTemplate {
        ctx: PageContext::load(user, &sess, flash).await?,
        books: books.iter().map(BookView::from).collect(),
        genres: repo.genres().await,
        q,
        genre,
    })
}

/// Book detail page.
pub async fn book_detail(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    sess: Session,
    Path(id): Path<String>,
    Query(flash): Query<Flash>,
) -> Result<BookDetailTemplate, AppError> {
    let book_id = BookId::new(id);
    let book = state.store().books().get(&book_id).await?;
    let in_wishlist = session::load_wishlist(&sess).await?.contains(&book_id);

    Ok(BookDetailTemplate {
        ctx: PageContext::load(user, &sess, flash).await?,
        book: BookView::from(&book),
        in_wishlist,
    })
}

/// Landing page after login. Sellers and admins get their own surfaces;
/// customers see their order history and a few in-stock picks.
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    sess: Session,
    Query(flash): Query<Flash>,
) -> Result<Response, AppError> {
    match user.role {
        Role::Seller => return Ok(Redirect::to("/seller").into_response()),
        Role::Admin => return Ok(Redirect::to("/admin").into_response()),
        Role::Customer => {}
    }

    let account = state.store().users().get(&user.email).await?;
    let orders = account.orders.iter().map(OrderSnapshotView::from).collect();

    let mut in_stock = state.store().books().list().await;
    in_stock.retain(Book::in_stock);
    in_stock.sort_by(|a, b| b.stock.cmp(&a.stock));
    let picks = in_stock.iter().take(4).map(BookView::from).collect();

    Ok(DashboardTemplate {
        ctx: PageContext::load(Some(user), &sess, flash).await?,
        orders,
        picks,
    }
    .into_response())
}
