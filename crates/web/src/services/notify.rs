//! Outbound webhook notifications.
//!
//! Order and signup events are POSTed as JSON to a single configured
//! webhook. Delivery is best effort: failures are logged and never bubble
//! into the request that triggered them.

use std::sync::Arc;

use serde_json::json;

use book_bazaar_core::Email;

use crate::models::{Book, Order, User};

#[derive(Debug)]
struct NotifierInner {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

/// Webhook notification client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Notifier {
    inner: Arc<NotifierInner>,
}

impl Notifier {
    /// Build a notifier. `webhook_url` of `None` disables delivery.
    #[must_use]
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            inner: Arc::new(NotifierInner {
                client: reqwest::Client::new(),
                webhook_url,
            }),
        }
    }

    /// Announce a per-seller order record to the webhook.
    pub async fn order_placed(&self, order: &Order) {
        self.post(json!({
            "event": "order_placed",
            "order_id": order.id.as_str(),
            "original_order_id": order.original_order_id.as_str(),
            "buyer_email": order.buyer_email.as_str(),
            "seller_email": order.seller_email.as_str(),
            "seller_name": order.seller_name,
            "total": order.total.to_string(),
            "item_count": order.item_count(),
            "status": order.status.to_string(),
        }))
        .await;
    }

    /// Announce a status change on an order record.
    pub async fn order_status_changed(&self, order: &Order) {
        self.post(json!({
            "event": "order_status_changed",
            "order_id": order.id.as_str(),
            "buyer_email": order.buyer_email.as_str(),
            "seller_email": order.seller_email.as_str(),
            "status": order.status.to_string(),
        }))
        .await;
    }

    /// Announce a new account.
    pub async fn user_signed_up(&self, user: &User) {
        self.post(json!({
            "event": "user_signed_up",
            "email": user.email.as_str(),
            "name": user.name,
            "role": user.role.to_string(),
        }))
        .await;
    }

    /// Announce a sign-in.
    pub async fn user_logged_in(&self, email: &Email) {
        self.post(json!({
            "event": "user_logged_in",
            "email": email.as_str(),
        }))
        .await;
    }

    /// Announce an account removal.
    pub async fn user_deleted(&self, email: &Email) {
        self.post(json!({
            "event": "user_deleted",
            "email": email.as_str(),
        }))
        .await;
    }

    /// Announce a new listing.
    pub async fn book_listed(&self, book: &Book) {
        self.post(json!({
            "event": "book_listed",
            "book_id": book.id.as_str(),
            "title": book.title,
            "seller_email": book.seller_email.as_str(),
            "price": book.price.to_string(),
            "stock": book.stock,
        }))
        .await;
    }

    /// Announce an edit to a listing.
    pub async fn book_updated(&self, book: &Book) {
        self.post(json!({
            "event": "book_updated",
            "book_id": book.id.as_str(),
            "title": book.title,
            "seller_email": book.seller_email.as_str(),
            "price": book.price.to_string(),
            "stock": book.stock,
        }))
        .await;
    }

    /// Announce a removed listing.
    pub async fn book_deleted(&self, book: &Book) {
        self.post(json!({
            "event": "book_deleted",
            "book_id": book.id.as_str(),
            "title": book.title,
            "seller_email": book.seller_email.as_str(),
        }))
        .await;
    }

    async fn post(&self, payload: serde_json::Value) {
        let Some(url) = self.inner.webhook_url.as_deref() else {
            tracing::debug!("notification webhook not configured, skipping");
            return;
        };

        let result = self.inner.client.post(url).json(&payload).send().await;
        match result {
            Ok(response) if response.status().is_success() => {
                tracing::debug!(status = %response.status(), "notification delivered");
            }
            Ok(response) => {
                tracing::warn!(status = %response.status(), "notification rejected by webhook");
            }
            Err(err) => {
                tracing::warn!(error = %err, "notification delivery failed");
            }
        }
    }
}
