//! Book catalog repository.

use book_bazaar_core::{BookId, Email};
use rust_decimal::Decimal;

use crate::models::Book;

use super::{RepositoryError, Store};

/// Fields a seller or admin may edit on an existing listing.
#[derive(Debug, Clone)]
pub struct BookUpdate {
    pub title: String,
    pub author: String,
    pub price: Decimal,
    pub genre: String,
    pub summary: String,
    pub cover_url: String,
    pub stock: u32,
}

/// Repository for the book catalog.
pub struct BookRepository<'a> {
    store: &'a Store,
}

impl<'a> BookRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    pub async fn insert(&self, book: Book) -> Book {
        self.store
            .books
            .write()
            .await
            .insert(book.id.clone(), book.clone());
        book
    }

    pub async fn find(&self, id: &BookId) -> Option<Book> {
        self.store.books.read().await.get(id).cloned()
    }

    /// Fetch a book or fail.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if the listing does not exist.
    pub async fn get(&self, id: &BookId) -> Result<Book, RepositoryError> {
        self.find(id).await.ok_or(RepositoryError::NotFound)
    }

    /// Full catalog, newest listings first.
    pub async fn list(&self) -> Vec<Book> {
        let mut books: Vec<Book> = self.store.books.read().await.values().cloned().collect();
        books.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        books
    }

    /// Listings owned by one seller, newest first.
    pub async fn list_by_seller(&self, seller_email: &Email) -> Vec<Book> {
        let mut books: Vec<Book> = self
            .store
            .books
            .read()
            .await
            .values()
            .filter(|b| b.seller_email == *seller_email)
            .cloned()
            .collect();
        books.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        books
    }

    /// Case-insensitive substring search over title, author, and genre.
    pub async fn search(&self, query: &str) -> Vec<Book> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.list().await;
        }
        self.list()
            .await
            .into_iter()
            .filter(|b| {
                b.title.to_lowercase().contains(&needle)
                    || b.author.to_lowercase().contains(&needle)
                    || b.genre.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Distinct genres present in the catalog, sorted.
    pub async fn genres(&self) -> Vec<String> {
        let mut genres: Vec<String> = self
            .store
            .books
            .read()
            .await
            .values()
            .map(|b| b.genre.clone())
            .collect();
        genres.sort();
        genres.dedup();
        genres
    }

    /// Overwrite the editable fields of a listing.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if the listing does not exist.
    pub async fn update(&self, id: &BookId, update: BookUpdate) -> Result<Book, RepositoryError> {
        let mut books = self.store.books.write().await;
        let book = books.get_mut(id).ok_or(RepositoryError::NotFound)?;
        book.title = update.title;
        book.author = update.author;
        book.price = update.price;
        book.genre = update.genre;
        book.summary = update.summary;
        book.cover_url = update.cover_url;
        book.stock = update.stock;
        Ok(book.clone())
    }

    /// Decrement stock by `quantity`, clamping at zero.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if the listing does not exist.
    pub async fn decrement_stock(
        &self,
        id: &BookId,
        quantity: u32,
    ) -> Result<u32, RepositoryError> {
        let mut books = self.store.books.write().await;
        let book = books.get_mut(id).ok_or(RepositoryError::NotFound)?;
        book.stock = book.stock.saturating_sub(quantity);
        Ok(book.stock)
    }

    /// Delete a listing.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if the listing does not exist.
    pub async fn delete(&self, id: &BookId) -> Result<(), RepositoryError> {
        self.store
            .books
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete every listing owned by a seller. Returns how many were removed.
    pub async fn delete_by_seller(&self, seller_email: &Email) -> usize {
        let mut books = self.store.books.write().await;
        let before = books.len();
        books.retain(|_, b| b.seller_email != *seller_email);
        before - books.len()
    }

    pub async fn count(&self) -> usize {
        self.store.books.read().await.len()
    }
}
