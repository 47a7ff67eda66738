//! Domain records stored in the in-memory tables and rendered in templates.

pub mod book;
pub mod order;
pub mod session;
pub mod user;

pub use book::{Book, NewBook, DEFAULT_COVER_URL};
pub use order::{Order, OrderItem, OrderSnapshot};
pub use session::{CartLine, CurrentUser, SessionCart, SessionWishlist};
pub use user::{Address, NewUser, User};
