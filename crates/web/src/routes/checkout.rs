//! Checkout pages. Payment is cash on delivery, so placing the order is
//! the whole flow.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use axum::response::Redirect;
use axum::Form;
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::AppError;
use crate::filters;
use crate::middleware::session;
use crate::middleware::RequireAuth;
use crate::services::checkout::{CheckoutError, CheckoutService};
use crate::state::AppState;

use super::cart::CartView;
use super::profile::AddressView;
use super::{redirect_with_error, redirect_with_success, Flash, PageContext};

/// Payment page template.
#[derive(Template, WebTemplate)]
#[template(path = "payment.html")]
pub struct PaymentTemplate {
    pub ctx: PageContext,
    pub cart: CartView,
    pub addresses: Vec<AddressView>,
}

#[derive(Debug, Deserialize)]
pub struct PlaceOrderForm {
    /// Index into the buyer's saved addresses.
    pub address_index: Option<usize>,
    /// Free-form address typed at checkout.
    pub address: Option<String>,
}

/// Checkout page: cart summary plus address selection.
pub async fn payment_page(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    sess: Session,
    Query(flash): Query<Flash>,
) -> Result<PaymentTemplate, AppError> {
    let cart = session::load_cart(&sess).await?;
    let account = state.store().users().get(&user.email).await?;
    let addresses = account
        .addresses
        .iter()
        .enumerate()
        .map(|(index, addr)| AddressView {
            index,
            label: addr.label.clone(),
            summary: addr.summary(),
        })
        .collect();

    Ok(PaymentTemplate {
        ctx: PageContext::load(Some(user), &sess, flash).await?,
        cart: CartView::resolve(&state, &cart).await,
        addresses,
    })
}

/// Place the order: validate stock, split by seller, clear the cart.
pub async fn place_order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    sess: Session,
    Form(form): Form<PlaceOrderForm>,
) -> Result<Redirect, AppError> {
    let account = state.store().users().get(&user.email).await?;
    let cart = session::load_cart(&sess).await?;

    let shipping_address = match form.address_index {
        Some(index) => match account.addresses.get(index) {
            Some(addr) => addr.summary(),
            None => {
                return Ok(redirect_with_error("/payment", "Please choose an address"));
            }
        },
        None => form.address.unwrap_or_default(),
    };

    let receipt = match CheckoutService::new(state.store())
        .place_order(&account, &cart, &shipping_address)
        .await
    {
        Ok(receipt) => receipt,
        Err(err @ CheckoutError::Repository(_)) => {
            tracing::error!(error = %err, "checkout failed");
            return Err(AppError::Internal(err.to_string()));
        }
        Err(err) => return Ok(redirect_with_error("/payment", &err.to_string())),
    };

    for order in &receipt.orders {
        state.notifier().order_placed(order).await;
    }

    let mut cart = cart;
    cart.clear();
    session::save_cart(&sess, &cart).await?;

    Ok(redirect_with_success(
        "/orders",
        &format!("Order {} placed. Thank you!", receipt.order_id),
    ))
}
