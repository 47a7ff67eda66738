//! Buyer-side order history, rendered from the snapshots on the user
//! record.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{OrderItem, OrderSnapshot};
use crate::state::AppState;

use super::{Flash, PageContext};

/// One purchase in the order list.
#[derive(Debug, Clone)]
pub struct OrderSnapshotView {
    pub order_id: String,
    pub placed_at: String,
    pub total: String,
    pub status: String,
    pub item_count: u32,
}

impl From<&OrderSnapshot> for OrderSnapshotView {
    fn from(snapshot: &OrderSnapshot) -> Self {
        Self {
            order_id: snapshot.order_id.clone(),
            placed_at: snapshot.placed_at.format("%b %d, %Y").to_string(),
            total: format!("${:.2}", snapshot.total()),
            status: snapshot.status_summary(),
            item_count: snapshot
                .parts
                .iter()
                .flat_map(|p| p.items.iter())
                .map(|i| i.quantity)
                .sum(),
        }
    }
}

/// One purchased line in the detail view.
#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub title: String,
    pub author: String,
    pub quantity: u32,
    pub price: String,
    pub line_total: String,
}

impl From<&OrderItem> for OrderItemView {
    fn from(item: &OrderItem) -> Self {
        Self {
            title: item.title.clone(),
            author: item.author.clone(),
            quantity: item.quantity,
            price: format!("${:.2}", item.price),
            line_total: format!("${:.2}", item.line_total()),
        }
    }
}

/// One seller's slice of a purchase in the detail view.
#[derive(Debug, Clone)]
pub struct OrderPartView {
    pub record_id: String,
    pub seller_name: String,
    pub status: String,
    pub total: String,
    pub items: Vec<OrderItemView>,
}

/// Order list template.
#[derive(Template, WebTemplate)]
#[template(path = "orders.html")]
pub struct OrdersTemplate {
    pub ctx: PageContext,
    pub orders: Vec<OrderSnapshotView>,
}

/// Order detail template.
#[derive(Template, WebTemplate)]
#[template(path = "order_detail.html")]
pub struct OrderDetailTemplate {
    pub ctx: PageContext,
    pub order_id: String,
    pub placed_at: String,
    pub shipping_address: String,
    pub total: String,
    pub parts: Vec<OrderPartView>,
}

#[derive(Debug, Deserialize)]
pub struct OrderPath {
    pub order_id: String,
}

/// Buyer order history, newest first.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    sess: Session,
    Query(flash): Query<Flash>,
) -> Result<OrdersTemplate, AppError> {
    let account = state.store().users().get(&user.email).await?;
    Ok(OrdersTemplate {
        ctx: PageContext::load(Some(user), &sess, flash).await?,
        orders: account.orders.iter().map(OrderSnapshotView::from).collect(),
    })
}

/// One purchase across all its sellers.
pub async fn detail(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    sess: Session,
    Path(path): Path<OrderPath>,
    Query(flash): Query<Flash>,
) -> Result<OrderDetailTemplate, AppError> {
    let account = state.store().users().get(&user.email).await?;
    let snapshot = account
        .order_snapshot(&path.order_id)
        .ok_or(AppError::NotFound)?;

    let parts = snapshot
        .parts
        .iter()
        .map(|part| OrderPartView {
            record_id: part.order_record_id.to_string(),
            seller_name: part.seller_name.clone(),
            status: part.status.to_string(),
            total: format!("${:.2}", part.total),
            items: part.items.iter().map(OrderItemView::from).collect(),
        })
        .collect();

    Ok(OrderDetailTemplate {
        ctx: PageContext::load(Some(user), &sess, flash).await?,
        order_id: snapshot.order_id.clone(),
        placed_at: snapshot.placed_at.format("%b %d, %Y %H:%M").to_string(),
        shipping_address: snapshot.shipping_address.clone(),
        total: format!("${:.2}", snapshot.total()),
        parts,
    })
}
