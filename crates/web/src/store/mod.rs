//! In-memory storage.
//!
//! Three tables (users, books, orders) held in `RwLock`ed maps, fronted by
//! repository types so route handlers never touch the maps directly. Data
//! lives for the life of the process; the seeder repopulates it on boot.

pub mod books;
pub mod orders;
pub mod users;

use std::collections::BTreeMap;

use book_bazaar_core::{BookId, Email, OrderId};
use tokio::sync::RwLock;

use crate::models::{Book, Order, User};

pub use books::BookRepository;
pub use orders::OrderRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The requested record does not exist.
    #[error("Record not found")]
    NotFound,

    /// A record with the same key already exists.
    #[error("Record already exists")]
    Conflict,
}

/// The process-wide table set.
#[derive(Debug, Default)]
pub struct Store {
    pub(crate) users: RwLock<BTreeMap<Email, User>>,
    pub(crate) books: RwLock<BTreeMap<BookId, Book>>,
    pub(crate) orders: RwLock<BTreeMap<OrderId, Order>>,
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository for the user table.
    #[must_use]
    pub const fn users(&self) -> UserRepository<'_> {
        UserRepository::new(self)
    }

    /// Repository for the book catalog.
    #[must_use]
    pub const fn books(&self) -> BookRepository<'_> {
        BookRepository::new(self)
    }

    /// Repository for per-seller order records.
    #[must_use]
    pub const fn orders(&self) -> OrderRepository<'_> {
        OrderRepository::new(self)
    }
}
