//! Order repository.
//!
//! Holds per-seller order records. Buyer-side history is a separate set of
//! snapshots on the user record; [`crate::store::UserRepository`] keeps those
//! in step when a status changes here.

use book_bazaar_core::{BookId, Email, OrderId, OrderStatus};

use crate::models::{Order, OrderItem};

use super::{RepositoryError, Store};

/// Repository for per-seller order records.
pub struct OrderRepository<'a> {
    store: &'a Store,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    pub async fn insert(&self, order: Order) -> Order {
        self.store
            .orders
            .write()
            .await
            .insert(order.id.clone(), order.clone());
        order
    }

    pub async fn find(&self, id: &OrderId) -> Option<Order> {
        self.store.orders.read().await.get(id).cloned()
    }

    /// Fetch an order record or fail.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if the record does not exist.
    pub async fn get(&self, id: &OrderId) -> Result<Order, RepositoryError> {
        self.find(id).await.ok_or(RepositoryError::NotFound)
    }

    /// Every order record, newest first.
    pub async fn list(&self) -> Vec<Order> {
        let mut orders: Vec<Order> = self.store.orders.read().await.values().cloned().collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }

    /// Records addressed to one seller, newest first.
    pub async fn list_by_seller(&self, seller_email: &Email) -> Vec<Order> {
        let mut orders: Vec<Order> = self
            .store
            .orders
            .read()
            .await
            .values()
            .filter(|o| o.seller_email == *seller_email)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }

    /// Change an order's status. Returns the updated record so the caller
    /// can sync the buyer's snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if the record does not exist.
    pub async fn update_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let mut orders = self.store.orders.write().await;
        let order = orders.get_mut(id).ok_or(RepositoryError::NotFound)?;
        order.status = status;
        Ok(order.clone())
    }

    /// Drop one line from an order record and recompute its total.
    /// Returns the updated record so the caller can sync the buyer's
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if the record or the line does
    /// not exist.
    pub async fn remove_item(
        &self,
        id: &OrderId,
        book_id: &BookId,
    ) -> Result<Order, RepositoryError> {
        let mut orders = self.store.orders.write().await;
        let order = orders.get_mut(id).ok_or(RepositoryError::NotFound)?;
        let before = order.items.len();
        order.items.retain(|item| item.book_id != *book_id);
        if order.items.len() == before {
            return Err(RepositoryError::NotFound);
        }
        order.total = order.items.iter().map(OrderItem::line_total).sum();
        Ok(order.clone())
    }

    pub async fn count(&self) -> usize {
        self.store.orders.read().await.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use book_bazaar_core::BookId;
    use crate::models::OrderItem;
    use chrono::Utc;

    fn order(id: &str, seller: &str, status: OrderStatus) -> Order {
        Order {
            id: OrderId::new(id),
            original_order_id: OrderId::new("ORD-1"),
            buyer_email: Email::parse("buyer@example.com").unwrap(),
            buyer_name: "Buyer".to_owned(),
            seller_email: Email::parse(&format!("{seller}@example.com")).unwrap(),
            seller_name: seller.to_owned(),
            status,
            items: vec![OrderItem {
                book_id: BookId::new("b-1"),
                title: "1984".to_owned(),
                author: "George Orwell".to_owned(),
                price: "8.99".parse().unwrap(),
                quantity: 1,
            }],
            total: "8.99".parse().unwrap(),
            shipping_address: "1 Main St".to_owned(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_list_by_seller_filters() {
        let store = Store::new();
        let repo = store.orders();
        repo.insert(order("ORD-1-alpha@example.com", "alpha", OrderStatus::Placed))
            .await;
        repo.insert(order("ORD-1-beta@example.com", "beta", OrderStatus::Placed))
            .await;

        let alpha = repo
            .list_by_seller(&Email::parse("alpha@example.com").unwrap())
            .await;
        assert_eq!(alpha.len(), 1);
        assert_eq!(alpha[0].id.as_str(), "ORD-1-alpha@example.com");
    }

    #[tokio::test]
    async fn test_update_status() {
        let store = Store::new();
        let repo = store.orders();
        let id = OrderId::new("ORD-1-alpha@example.com");
        repo.insert(order(id.as_str(), "alpha", OrderStatus::Placed))
            .await;

        let updated = repo.update_status(&id, OrderStatus::Shipped).await.unwrap();
        assert_eq!(updated.status, OrderStatus::Shipped);

        let err = repo
            .update_status(&OrderId::new("ORD-missing"), OrderStatus::Shipped)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_remove_item_recomputes_total() {
        let store = Store::new();
        let repo = store.orders();
        let id = OrderId::new("ORD-1-alpha@example.com");
        let mut record = order(id.as_str(), "alpha", OrderStatus::Placed);
        record.items.push(OrderItem {
            book_id: BookId::new("b-2"),
            title: "Dune".to_owned(),
            author: "Frank Herbert".to_owned(),
            price: "12.99".parse().unwrap(),
            quantity: 2,
        });
        record.total = "34.97".parse().unwrap();
        repo.insert(record).await;

        let updated = repo.remove_item(&id, &BookId::new("b-1")).await.unwrap();
        assert_eq!(updated.items.len(), 1);
        assert_eq!(updated.total, "25.98".parse().unwrap());

        let err = repo.remove_item(&id, &BookId::new("b-1")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
