//! User accounts.

use book_bazaar_core::{Email, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::order::OrderSnapshot;

/// A saved shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub label: String,
    pub line1: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl Address {
    /// Single-line rendering used on the payment page and order records.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}, {}, {} {}",
            self.line1, self.city, self.postal_code, self.country
        )
    }
}

/// A registered account. Admins and sellers live in the same table as
/// customers, distinguished only by [`Role`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Primary key. Emails identify users everywhere in the app.
    pub email: Email,
    pub name: String,
    /// Argon2 PHC string, never the raw password.
    pub password_hash: String,
    pub role: Role,
    /// Saved shipping addresses, newest last.
    pub addresses: Vec<Address>,
    /// Buyer-side order history, one snapshot per placed order
    /// (pre-split, spanning all sellers). Newest first.
    pub orders: Vec<OrderSnapshot>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Find the buyer-side snapshot for a placed order, if any.
    #[must_use]
    pub fn order_snapshot(&self, original_order_id: &str) -> Option<&OrderSnapshot> {
        self.orders
            .iter()
            .find(|o| o.order_id == original_order_id)
    }
}

/// Input for creating an account. The password arrives raw and is hashed
/// by the auth service before the record is stored.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
}
