//! Session-scoped state: the signed-in user, cart, and wishlist.
//!
//! Carts and wishlists live in the session rather than the store, so they
//! vanish on logout or expiry. Only checkout turns them into durable records.

use book_bazaar_core::{BookId, Email, Role};
use serde::{Deserialize, Serialize};

use super::user::User;

/// Identity kept in the session after login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub email: Email,
    pub name: String,
    pub role: Role,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }
}

/// One cart entry. Prices are re-read from the catalog at render and
/// checkout time, so only the id and quantity are kept here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub book_id: BookId,
    pub quantity: u32,
}

/// Shopping cart stored under [`crate::middleware::session_keys::CART`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionCart {
    pub lines: Vec<CartLine>,
}

impl SessionCart {
    /// Add `quantity` of a book, merging with an existing line.
    pub fn add(&mut self, book_id: BookId, quantity: u32) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.book_id == book_id) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(CartLine { book_id, quantity });
        }
    }

    /// Set a line's quantity exactly. Zero removes the line.
    pub fn set_quantity(&mut self, book_id: &BookId, quantity: u32) {
        if quantity == 0 {
            self.remove(book_id);
        } else if let Some(line) = self.lines.iter_mut().find(|l| l.book_id == *book_id) {
            line.quantity = quantity;
        }
    }

    pub fn remove(&mut self, book_id: &BookId) {
        self.lines.retain(|l| l.book_id != *book_id);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines, shown in the navbar badge.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

/// Wishlist stored under [`crate::middleware::session_keys::WISHLIST`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionWishlist {
    pub book_ids: Vec<BookId>,
}

impl SessionWishlist {
    /// Add a book if not already present. Returns whether it was added.
    pub fn add(&mut self, book_id: BookId) -> bool {
        if self.book_ids.contains(&book_id) {
            return false;
        }
        self.book_ids.push(book_id);
        true
    }

    pub fn remove(&mut self, book_id: &BookId) {
        self.book_ids.retain(|id| id != book_id);
    }

    #[must_use]
    pub fn contains(&self, book_id: &BookId) -> bool {
        self.book_ids.contains(book_id)
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn item_count(&self) -> u32 {
        self.book_ids.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_add_merges_lines() {
        let mut cart = SessionCart::default();
        cart.add(BookId::new("b-1"), 1);
        cart.add(BookId::new("b-1"), 2);
        cart.add(BookId::new("b-2"), 1);

        assert_eq!(cart.lines.len(), 2);
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_cart_set_quantity_zero_removes() {
        let mut cart = SessionCart::default();
        cart.add(BookId::new("b-1"), 3);
        cart.set_quantity(&BookId::new("b-1"), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_wishlist_deduplicates() {
        let mut wishlist = SessionWishlist::default();
        assert!(wishlist.add(BookId::new("b-1")));
        assert!(!wishlist.add(BookId::new("b-1")));
        assert_eq!(wishlist.item_count(), 1);

        wishlist.remove(&BookId::new("b-1"));
        assert!(!wishlist.contains(&BookId::new("b-1")));
    }
}
