//! Checkout: stock validation, per-seller order fan-out, snapshot write.
//!
//! A cart can hold books from several sellers. Placing it produces one order
//! record per seller, all sharing the purchase id, plus a single buyer-side
//! snapshot spanning every part. Stock is validated up front and decremented
//! after the split, clamped at zero.

use std::collections::BTreeMap;

use book_bazaar_core::{BookId, Email, OrderId, OrderStatus};
use chrono::Utc;
use rust_decimal::Decimal;

use crate::models::order::SnapshotSellerPart;
use crate::models::{Book, Order, OrderItem, OrderSnapshot, SessionCart, User};
use crate::store::{RepositoryError, Store};

/// Errors that abort a checkout before anything is written.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Please choose a shipping address")]
    MissingAddress,

    #[error("\"{title}\" is no longer available")]
    BookUnavailable { title: String },

    #[error("Only {available} of \"{title}\" in stock (you asked for {requested})")]
    InsufficientStock {
        title: String,
        available: u32,
        requested: u32,
    },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Outcome of a successful checkout.
#[derive(Debug, Clone)]
pub struct CheckoutReceipt {
    /// The purchase id shared by every per-seller record (`ORD-<millis>`).
    pub order_id: String,
    /// Per-seller records created, in seller-email order.
    pub orders: Vec<Order>,
    pub grand_total: Decimal,
}

/// Turns session carts into order records.
pub struct CheckoutService<'a> {
    store: &'a Store,
}

impl<'a> CheckoutService<'a> {
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Place an order for everything in the cart.
    ///
    /// # Errors
    ///
    /// Fails without side effects if the cart is empty, the address is
    /// blank, a book has disappeared, or a line asks for more units than
    /// are in stock.
    pub async fn place_order(
        &self,
        buyer: &User,
        cart: &SessionCart,
        shipping_address: &str,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let shipping_address = shipping_address.trim();
        if shipping_address.is_empty() {
            return Err(CheckoutError::MissingAddress);
        }

        // Resolve and validate every line before touching any table.
        let mut resolved: Vec<(Book, u32)> = Vec::with_capacity(cart.lines.len());
        for line in &cart.lines {
            let book = self.store.books().find(&line.book_id).await.ok_or_else(|| {
                CheckoutError::BookUnavailable {
                    title: line.book_id.to_string(),
                }
            })?;
            if line.quantity > book.stock {
                return Err(CheckoutError::InsufficientStock {
                    title: book.title,
                    available: book.stock,
                    requested: line.quantity,
                });
            }
            resolved.push((book, line.quantity));
        }

        let order_id = format!("ORD-{}", Utc::now().timestamp_millis());
        let placed_at = Utc::now();

        // Fan out by seller. BTreeMap keeps record creation deterministic.
        let mut by_seller: BTreeMap<Email, Vec<(Book, u32)>> = BTreeMap::new();
        for (book, quantity) in resolved {
            by_seller
                .entry(book.seller_email.clone())
                .or_default()
                .push((book, quantity));
        }

        let mut orders = Vec::with_capacity(by_seller.len());
        let mut parts = Vec::with_capacity(by_seller.len());
        let mut grand_total = Decimal::ZERO;

        for (seller_email, seller_lines) in by_seller {
            let seller_name = seller_lines[0].0.seller_name.clone();
            let items: Vec<OrderItem> = seller_lines
                .iter()
                .map(|(book, quantity)| OrderItem {
                    book_id: book.id.clone(),
                    title: book.title.clone(),
                    author: book.author.clone(),
                    price: book.price,
                    quantity: *quantity,
                })
                .collect();
            let total: Decimal = items.iter().map(OrderItem::line_total).sum();
            grand_total += total;

            let record_id = OrderId::new(format!("{order_id}-{seller_email}"));
            let order = Order {
                id: record_id.clone(),
                original_order_id: OrderId::new(order_id.clone()),
                buyer_email: buyer.email.clone(),
                buyer_name: buyer.name.clone(),
                seller_email: seller_email.clone(),
                seller_name: seller_name.clone(),
                status: OrderStatus::Placed,
                items: items.clone(),
                total,
                shipping_address: shipping_address.to_owned(),
                created_at: placed_at,
            };
            self.store.orders().insert(order.clone()).await;

            for (book, quantity) in &seller_lines {
                self.store.books().decrement_stock(&book.id, *quantity).await?;
            }

            parts.push(SnapshotSellerPart {
                order_record_id: record_id,
                seller_name,
                seller_email,
                status: OrderStatus::Placed,
                items,
                total,
            });
            orders.push(order);
        }

        let snapshot = OrderSnapshot {
            order_id: order_id.clone(),
            placed_at,
            shipping_address: shipping_address.to_owned(),
            parts,
        };
        self.store
            .users()
            .push_order_snapshot(&buyer.email, snapshot)
            .await?;

        tracing::info!(
            order_id = %order_id,
            buyer = %buyer.email,
            sellers = orders.len(),
            total = %grand_total,
            "order placed"
        );

        Ok(CheckoutReceipt {
            order_id,
            orders,
            grand_total,
        })
    }

    /// Move an order record to a new status and write it through to the
    /// buyer's snapshot. Returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if the record does not exist.
    /// A missing buyer snapshot is logged but does not fail the update.
    pub async fn update_order_status(
        &self,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let order = self.store.orders().update_status(order_id, status).await?;

        if let Err(err) = self
            .store
            .users()
            .sync_snapshot_status(&order.buyer_email, order.id.as_str(), status)
            .await
        {
            tracing::warn!(
                order_id = %order.id,
                buyer = %order.buyer_email,
                error = %err,
                "buyer snapshot not synced"
            );
        }

        tracing::info!(order_id = %order.id, status = %status, "order status updated");
        Ok(order)
    }

    /// Drop one line from an order record, recompute its total, and write
    /// the change through to the buyer's snapshot. Returns the updated
    /// record.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if the record or the line does
    /// not exist. A missing buyer snapshot is logged but does not fail the
    /// removal.
    pub async fn remove_order_item(
        &self,
        order_id: &OrderId,
        book_id: &BookId,
    ) -> Result<Order, RepositoryError> {
        let order = self.store.orders().remove_item(order_id, book_id).await?;

        if let Err(err) = self
            .store
            .users()
            .sync_snapshot_items(
                &order.buyer_email,
                order.id.as_str(),
                order.items.clone(),
                order.total,
            )
            .await
        {
            tracing::warn!(
                order_id = %order.id,
                buyer = %order.buyer_email,
                error = %err,
                "buyer snapshot not synced"
            );
        }

        tracing::info!(
            order_id = %order.id,
            book_id = %book_id,
            total = %order.total,
            "order line removed"
        );
        Ok(order)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use book_bazaar_core::Role;
    use crate::models::{NewBook, NewUser};

    async fn seed_buyer(store: &Store) -> User {
        store
            .users()
            .create(NewUser {
                email: Email::parse("buyer@example.com").unwrap(),
                name: "Buyer".to_owned(),
                password_hash: "$argon2id$fake".to_owned(),
                role: Role::Customer,
            })
            .await
            .unwrap()
    }

    async fn seed_book(store: &Store, title: &str, seller: &str, stock: u32, price: &str) -> Book {
        store
            .books()
            .insert(
                NewBook {
                    title: title.to_owned(),
                    author: "Author".to_owned(),
                    price: price.parse().unwrap(),
                    genre: "Fiction".to_owned(),
                    summary: String::new(),
                    cover_url: None,
                    stock,
                    seller_name: seller.to_owned(),
                    seller_email: Email::parse(&format!("{seller}@example.com")).unwrap(),
                }
                .into_book(),
            )
            .await
    }

    #[tokio::test]
    async fn test_multi_seller_fan_out() {
        let store = Store::new();
        let buyer = seed_buyer(&store).await;
        let a = seed_book(&store, "Gatsby", "alpha", 10, "10.99").await;
        let b = seed_book(&store, "1984", "beta", 10, "8.99").await;

        let mut cart = SessionCart::default();
        cart.add(a.id.clone(), 2);
        cart.add(b.id.clone(), 1);

        let receipt = CheckoutService::new(&store)
            .place_order(&buyer, &cart, "1 Main St")
            .await
            .unwrap();

        assert_eq!(receipt.orders.len(), 2);
        assert!(receipt.order_id.starts_with("ORD-"));
        for order in &receipt.orders {
            assert_eq!(order.original_order_id.as_str(), receipt.order_id);
            assert_eq!(
                order.id.as_str(),
                format!("{}-{}", receipt.order_id, order.seller_email)
            );
            assert_eq!(order.status, OrderStatus::Placed);
        }
        assert_eq!(receipt.grand_total, "30.97".parse().unwrap());

        // Stock decremented per line.
        assert_eq!(store.books().get(&a.id).await.unwrap().stock, 8);
        assert_eq!(store.books().get(&b.id).await.unwrap().stock, 9);

        // Buyer snapshot spans both sellers.
        let buyer = store.users().get(&buyer.email).await.unwrap();
        assert_eq!(buyer.orders.len(), 1);
        assert_eq!(buyer.orders[0].parts.len(), 2);
        assert_eq!(buyer.orders[0].total(), receipt.grand_total);
    }

    #[tokio::test]
    async fn test_insufficient_stock_rejects_whole_order() {
        let store = Store::new();
        let buyer = seed_buyer(&store).await;
        let a = seed_book(&store, "Gatsby", "alpha", 1, "10.99").await;

        let mut cart = SessionCart::default();
        cart.add(a.id.clone(), 3);

        let err = CheckoutService::new(&store)
            .place_order(&buyer, &cart, "1 Main St")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::InsufficientStock {
                available: 1,
                requested: 3,
                ..
            }
        ));

        // Nothing written.
        assert_eq!(store.orders().count().await, 0);
        assert_eq!(store.books().get(&a.id).await.unwrap().stock, 1);
        let buyer = store.users().get(&buyer.email).await.unwrap();
        assert!(buyer.orders.is_empty());
    }

    #[tokio::test]
    async fn test_empty_cart_and_blank_address() {
        let store = Store::new();
        let buyer = seed_buyer(&store).await;
        let service = CheckoutService::new(&store);

        let err = service
            .place_order(&buyer, &SessionCart::default(), "1 Main St")
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));

        let book = seed_book(&store, "Gatsby", "alpha", 5, "10.99").await;
        let mut cart = SessionCart::default();
        cart.add(book.id, 1);
        let err = service.place_order(&buyer, &cart, "  ").await.unwrap_err();
        assert!(matches!(err, CheckoutError::MissingAddress));
    }

    #[tokio::test]
    async fn test_status_update_syncs_buyer_snapshot() {
        let store = Store::new();
        let buyer = seed_buyer(&store).await;
        let book = seed_book(&store, "Gatsby", "alpha", 5, "10.99").await;

        let mut cart = SessionCart::default();
        cart.add(book.id, 1);
        let service = CheckoutService::new(&store);
        let receipt = service
            .place_order(&buyer, &cart, "1 Main St")
            .await
            .unwrap();

        let record_id = receipt.orders[0].id.clone();
        service
            .update_order_status(&record_id, OrderStatus::Shipped)
            .await
            .unwrap();

        let buyer = store.users().get(&buyer.email).await.unwrap();
        assert_eq!(buyer.orders[0].parts[0].status, OrderStatus::Shipped);
    }

    #[tokio::test]
    async fn test_remove_order_item_syncs_buyer_snapshot() {
        let store = Store::new();
        let buyer = seed_buyer(&store).await;
        let a = seed_book(&store, "Gatsby", "alpha", 10, "10.99").await;
        let b = seed_book(&store, "Dune", "alpha", 10, "12.99").await;

        let mut cart = SessionCart::default();
        cart.add(a.id.clone(), 1);
        cart.add(b.id.clone(), 2);
        let service = CheckoutService::new(&store);
        let receipt = service
            .place_order(&buyer, &cart, "1 Main St")
            .await
            .unwrap();

        let record_id = receipt.orders[0].id.clone();
        let updated = service.remove_order_item(&record_id, &a.id).await.unwrap();
        assert_eq!(updated.items.len(), 1);
        assert_eq!(updated.total, "25.98".parse().unwrap());

        let buyer = store.users().get(&buyer.email).await.unwrap();
        assert_eq!(buyer.orders[0].parts[0].items.len(), 1);
        assert_eq!(buyer.orders[0].total(), "25.98".parse().unwrap());
    }
}
