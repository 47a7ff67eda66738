//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                         - Catalog home (search + genre filter)
//! GET  /health                   - Health check
//! GET  /books/{id}               - Book detail
//!
//! # Auth
//! GET  /signup                   - Signup page
//! POST /signup                   - Create account
//! GET  /login                    - Login page
//! POST /login                    - Login action
//! POST /logout                   - Logout action
//!
//! # Customer (requires auth)
//! GET  /dashboard                - Role-aware dashboard redirect
//! GET  /cart                     - Cart page
//! POST /cart/add                 - Add a book to the cart
//! POST /cart/update              - Change a line quantity
//! POST /cart/remove              - Remove a line
//! GET  /wishlist                 - Wishlist page
//! POST /wishlist/add             - Save a book
//! POST /wishlist/remove          - Unsave a book
//! POST /wishlist/move-to-cart    - Move a saved book into the cart
//! GET  /profile                  - Profile page
//! POST /profile/name             - Update display name
//! POST /profile/address          - Add a shipping address
//! POST /profile/address/delete   - Remove a shipping address
//! GET  /payment                  - Checkout page
//! POST /payment                  - Place the order
//! GET  /orders                   - Buyer order history
//! GET  /orders/{order_id}        - One purchase, all sellers
//!
//! # Seller (requires seller role)
//! GET  /seller                   - Seller dashboard
//! GET  /seller/books             - Own listings
//! GET  /seller/books/add         - New listing form
//! POST /seller/books/add         - Create listing
//! GET  /seller/books/{id}/edit   - Edit listing form
//! POST /seller/books/{id}/edit   - Update listing
//! POST /seller/books/{id}/delete - Remove listing
//! GET  /seller/orders            - Received orders
//! POST /seller/orders/{id}/status - Move an order forward
//!
//! # Admin (requires admin role)
//! GET  /admin                    - Store overview
//! GET  /admin/users              - All accounts (role filter + search)
//! GET  /admin/users/{email}      - Account detail
//! POST /admin/users/{email}/delete - Remove an account
//! GET  /admin/sellers            - Seller accounts
//! GET  /admin/books              - Whole catalog (genre filter + search)
//! GET  /admin/books/{id}/edit    - Edit any listing
//! POST /admin/books/{id}/edit    - Update any listing
//! POST /admin/books/{id}/delete  - Remove a listing
//! GET  /admin/orders             - All order records
//! GET  /admin/orders/{id}        - Order record detail
//! POST /admin/orders/{id}/status - Override an order status
//! POST /admin/orders/{id}/items/{book_id}/remove - Drop a line
//! GET  /admin/analytics          - Revenue and histogram views
//!
//! # API (JSON)
//! POST /api/chatbot              - Shopping assistant
//! POST /api/chatbot/add-to-wishlist - Save a recommended book
//! GET  /api/books/{id}           - One catalog record
//! GET  /api/cart/count           - Cart badge count
//! ```

pub mod admin;
pub mod api;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod orders;
pub mod profile;
pub mod seller;
pub mod wishlist;

use axum::response::Redirect;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::AppError;
use crate::middleware::session;
use crate::models::{Book, CurrentUser};
use crate::state::AppState;

/// Flash messages carried through redirect query strings.
#[derive(Debug, Default, Deserialize)]
pub struct Flash {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Redirect to `path` with a flash error.
pub fn redirect_with_error(path: &str, message: &str) -> Redirect {
    Redirect::to(&format!("{path}?error={}", urlencoding::encode(message)))
}

/// Redirect to `path` with a flash success message.
pub fn redirect_with_success(path: &str, message: &str) -> Redirect {
    Redirect::to(&format!("{path}?success={}", urlencoding::encode(message)))
}

/// Data every page template needs: the signed-in user, navbar badge
/// counts, and any flash message.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub user: Option<CurrentUser>,
    pub cart_count: u32,
    pub wishlist_count: u32,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl PageContext {
    /// Assemble the context from the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn load(
        user: Option<CurrentUser>,
        sess: &Session,
        flash: Flash,
    ) -> Result<Self, AppError> {
        let cart_count = session::load_cart(sess).await?.item_count();
        let wishlist_count = session::load_wishlist(sess).await?.item_count();
        Ok(Self {
            user,
            cart_count,
            wishlist_count,
            error: flash.error,
            success: flash.success,
        })
    }
}

/// Book display data shared across catalog, cart, and dashboard templates.
#[derive(Debug, Clone)]
pub struct BookView {
    pub id: String,
    pub title: String,
    pub author: String,
    pub price: String,
    pub genre: String,
    pub summary: String,
    pub cover_url: String,
    pub stock: u32,
    pub seller_name: String,
}

impl From<&Book> for BookView {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.to_string(),
            title: book.title.clone(),
            author: book.author.clone(),
            price: format!("${:.2}", book.price),
            genre: book.genre.clone(),
            summary: book.summary.clone(),
            cover_url: book.cover_url.clone(),
            stock: book.stock,
            seller_name: book.seller_name.clone(),
        }
    }
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/add", post(wishlist::add))
        .route("/remove", post(wishlist::remove))
        .route("/move-to-cart", post(wishlist::move_to_cart))
}

/// Create the profile routes router.
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(profile::show))
        .route("/name", post(profile::update_name))
        .route("/address", post(profile::add_address))
        .route("/address/delete", post(profile::delete_address))
}

/// Create the seller routes router.
pub fn seller_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(seller::dashboard))
        .route("/books", get(seller::books))
        .route("/books/add", get(seller::add_book_page).post(seller::add_book))
        .route(
            "/books/{id}/edit",
            get(seller::edit_book_page).post(seller::edit_book),
        )
        .route("/books/{id}/delete", post(seller::delete_book))
        .route("/orders", get(seller::orders))
        .route("/orders/{id}/status", post(seller::update_order_status))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::dashboard))
        .route("/users", get(admin::users))
        .route("/users/{email}", get(admin::user_details))
        .route("/users/{email}/delete", post(admin::delete_user))
        .route("/sellers", get(admin::sellers))
        .route("/books", get(admin::books))
        .route(
            "/books/{id}/edit",
            get(admin::edit_book_page).post(admin::edit_book),
        )
        .route("/books/{id}/delete", post(admin::delete_book))
        .route("/orders", get(admin::orders))
        .route("/orders/{id}", get(admin::order_detail))
        .route("/orders/{id}/status", post(admin::update_order_status))
        .route(
            "/orders/{id}/items/{book_id}/remove",
            post(admin::remove_order_item),
        )
        .route("/analytics", get(admin::analytics))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/chatbot", post(api::chatbot))
        .route("/chatbot/add-to-wishlist", post(api::add_to_wishlist))
        .route("/books/{id}", get(api::book))
        .route("/cart/count", get(api::cart_count))
}

/// Create all routes for the application.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/health", get(home::health))
        .route("/books/{id}", get(home::book_detail))
        .route("/dashboard", get(home::dashboard))
        .merge(auth_routes())
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
        .nest("/profile", profile_routes())
        .route("/payment", get(checkout::payment_page).post(checkout::place_order))
        .route("/orders", get(orders::list))
        .route("/orders/{order_id}", get(orders::detail))
        .nest("/seller", seller_routes())
        .nest("/admin", admin_routes())
        .nest("/api", api_routes())
}
