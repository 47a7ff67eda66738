//! Orders and the buyer-side snapshots kept on user records.

use book_bazaar_core::{BookId, Email, OrderId, OrderStatus};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One purchased line within an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    /// Unit price at purchase time.
    pub price: Decimal,
    pub quantity: u32,
}

impl OrderItem {
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// A per-seller order record, the unit sellers fulfill.
///
/// Checkout splits a cart by seller, so one purchase can produce several of
/// these. They share an `original_order_id` and each gets its own id of the
/// form `ORD-<millis>-<seller email>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// The pre-split purchase id shared by sibling records.
    pub original_order_id: OrderId,
    pub buyer_email: Email,
    pub buyer_name: String,
    pub seller_email: Email,
    pub seller_name: String,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub total: Decimal,
    pub shipping_address: String,
    pub created_at: DateTime<Utc>,
}

impl Order {
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// Seller-facing slice of an order as the buyer sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotSellerPart {
    pub order_record_id: OrderId,
    pub seller_name: String,
    pub seller_email: Email,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub total: Decimal,
}

/// Buyer-side view of a whole purchase, stored on the user record.
///
/// Spans every seller the purchase touched. Status changes made by sellers
/// are written through to the matching part here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSnapshot {
    /// The pre-split purchase id (`ORD-<millis>`).
    pub order_id: String,
    pub placed_at: DateTime<Utc>,
    pub shipping_address: String,
    pub parts: Vec<SnapshotSellerPart>,
}

impl OrderSnapshot {
    /// Grand total across all sellers.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.parts.iter().map(|p| p.total).sum()
    }

    /// Combined status line shown in the buyer's order list.
    ///
    /// A single-seller purchase reads as that record's status; otherwise
    /// each part is listed.
    #[must_use]
    pub fn status_summary(&self) -> String {
        match self.parts.as_slice() {
            [only] => only.status.to_string(),
            parts => parts
                .iter()
                .map(|p| format!("{}: {}", p.seller_name, p.status))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}
