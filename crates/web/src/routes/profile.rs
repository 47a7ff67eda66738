//! Profile page: display name and shipping addresses.

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
use crate::models::{Address, CurrentUser};
use crate::state::AppState;

use super::{redirect_with_error, redirect_with_success, Flash, PageContext};

/// Address display data, keyed by position for the delete form.
#[derive(Debug, Clone)]
pub struct AddressView {
    pub index: usize,
    pub label: String,
    pub summary: String,
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub ctx: PageContext,
    pub name: String,
    pub email: String,
    pub role: String,
    pub member_since: String,
    pub addresses: Vec<AddressView>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNameForm {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AddAddressForm {
    pub label: String,
    pub line1: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAddressForm {
    pub index: usize,
}

/// Profile page.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    sess: Session,
    Query(flash): Query<Flash>,
) -> Result<ProfileTemplate, AppError> {
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

    Ok(ProfileTemplate {
        ctx: PageContext::load(Some(user), &sess, flash).await?,
        name: account.name,
        email: account.email.into_inner(),
        role: account.role.to_string(),
        member_since: account.created_at.format("%B %Y").to_string(),
        addresses,
    })
}

/// Update the display name, in the store and the session.
pub async fn update_name(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    sess: Session,
    Form(form): Form<UpdateNameForm>,
) -> Result<Redirect, AppError> {
    let name = form.name.trim();
    if name.is_empty() {
        return Ok(redirect_with_error("/profile", "Name cannot be empty"));
    }

    state
        .store()
        .users()
        .update_name(&user.email, name.to_owned())
        .await?;

    let refreshed = CurrentUser {
        name: name.to_owned(),
        ..user
    };
    session::sign_in(&sess, &refreshed).await?;

    Ok(redirect_with_success("/profile", "Name updated"))
}

/// Add a shipping address.
pub async fn add_address(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<AddAddressForm>,
) -> Result<Redirect, AppError> {
    if form.line1.trim().is_empty() || form.city.trim().is_empty() {
        return Ok(redirect_with_error(
            "/profile",
            "Street and city are required",
        ));
    }

    let address = Address {
        label: if form.label.trim().is_empty() {
            "Address".to_owned()
        } else {
            form.label.trim().to_owned()
        },
        line1: form.line1.trim().to_owned(),
        city: form.city.trim().to_owned(),
        postal_code: form.postal_code.trim().to_owned(),
        country: form.country.trim().to_owned(),
    };
    state.store().users().add_address(&user.email, address).await?;

    Ok(redirect_with_success("/profile", "Address added"))
}

/// Remove a shipping address.
pub async fn delete_address(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<DeleteAddressForm>,
) -> Result<Redirect, AppError> {
    match state
        .store()
        .users()
        .remove_address(&user.email, form.index)
        .await
    {
        Ok(()) => Ok(redirect_with_success("/profile", "Address removed")),
        Err(_) => Ok(redirect_with_error("/profile", "Address not found")),
    }
}
