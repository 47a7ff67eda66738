//! Catalog books.

use book_bazaar_core::{BookId, Email};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Placeholder cover shown when a listing has no image of its own.
pub const DEFAULT_COVER_URL: &str = "https://placehold.co/150x220/e0e0e0/333333?text=Book";

/// A book listed in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub price: Decimal,
    pub genre: String,
    pub summary: String,
    pub cover_url: String,
    /// Units available. Checkout clamps decrements at zero.
    pub stock: u32,
    pub seller_name: String,
    pub seller_email: Email,
    pub created_at: DateTime<Utc>,
}

impl Book {
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Short blurb for chat assistant replies and list views.
    #[must_use]
    pub fn card_summary(&self) -> String {
        format!("{} by {} (${:.2})", self.title, self.author, self.price)
    }
}

/// Input for listing a new book from the seller dashboard.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub price: Decimal,
    pub genre: String,
    pub summary: String,
    /// Empty input falls back to [`DEFAULT_COVER_URL`].
    pub cover_url: Option<String>,
    pub stock: u32,
    pub seller_name: String,
    pub seller_email: Email,
}

impl NewBook {
    /// Materialize the listing with a fresh ID and resolved cover.
    #[must_use]
    pub fn into_book(self) -> Book {
        let cover_url = match self.cover_url {
            Some(url) if !url.trim().is_empty() => url,
            _ => DEFAULT_COVER_URL.to_owned(),
        };
        Book {
            id: BookId::generate(),
            title: self.title,
            author: self.author,
            price: self.price,
            genre: self.genre,
            summary: self.summary,
            cover_url,
            stock: self.stock,
            seller_name: self.seller_name,
            seller_email: self.seller_email,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn new_book(cover_url: Option<String>) -> NewBook {
        NewBook {
            title: "Dune".to_owned(),
            author: "Frank Herbert".to_owned(),
            price: Decimal::new(1299, 2),
            genre: "Sci-Fi".to_owned(),
            summary: "Desert planet politics.".to_owned(),
            cover_url,
            stock: 4,
            seller_name: "Arrakis Press".to_owned(),
            seller_email: Email::parse("arrakis@example.com").unwrap(),
        }
    }

    #[test]
    fn test_missing_cover_uses_placeholder() {
        let book = new_book(None).into_book();
        assert_eq!(book.cover_url, DEFAULT_COVER_URL);

        let book = new_book(Some("  ".to_owned())).into_book();
        assert_eq!(book.cover_url, DEFAULT_COVER_URL);
    }

    #[test]
    fn test_explicit_cover_kept() {
        let book = new_book(Some("https://covers.example/dune.jpg".to_owned())).into_book();
        assert_eq!(book.cover_url, "https://covers.example/dune.jpg");
    }

    #[test]
    fn test_card_summary_formats_price() {
        let book = new_book(None).into_book();
        assert_eq!(book.card_summary(), "Dune by Frank Herbert ($12.99)");
    }
}
