//! Signup, login, and logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use axum::response::Redirect;
use axum::Form;
use book_bazaar_core::Role;
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::AppError;
use crate::filters;
use crate::middleware::session;
use crate::middleware::OptionalAuth;
use crate::models::CurrentUser;
use crate::services::auth::AuthService;
use crate::state::AppState;

use super::{redirect_with_error, Flash, PageContext};

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub ctx: PageContext,
    pub next: String,
}

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "signup.html")]
pub struct SignupTemplate {
    pub ctx: PageContext,
}

#[derive(Debug, Default, Deserialize)]
pub struct NextParam {
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    /// `customer` or `seller`. Admin accounts are seeded, never self-service.
    pub role: Option<String>,
}

/// Only allow redirects back into this site.
fn safe_next(next: Option<String>) -> String {
    match next {
        Some(n) if n.starts_with('/') && !n.starts_with("//") => n,
        _ => "/dashboard".to_owned(),
    }
}

pub async fn login_page(
    OptionalAuth(user): OptionalAuth,
    sess: Session,
    Query(flash): Query<Flash>,
    Query(params): Query<NextParam>,
) -> Result<LoginTemplate, AppError> {
    Ok(LoginTemplate {
        ctx: PageContext::load(user, &sess, flash).await?,
        next: safe_next(params.next),
    })
}

pub async fn login(
    State(state): State<AppState>,
    sess: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, AppError> {
    let auth = AuthService::new(state.store());
    match auth.login(&form.email, &form.password).await {
        Ok(user) => {
            state.notifier().user_logged_in(&user.email).await;
            session::sign_in(&sess, &CurrentUser::from(&user)).await?;
            Ok(Redirect::to(&safe_next(form.next)))
        }
        Err(err) => {
            tracing::debug!(email = %form.email, error = %err, "login rejected");
            Ok(redirect_with_error("/login", "Invalid email or password"))
        }
    }
}

pub async fn signup_page(
    OptionalAuth(user): OptionalAuth,
    sess: Session,
    Query(flash): Query<Flash>,
) -> Result<SignupTemplate, AppError> {
    Ok(SignupTemplate {
        ctx: PageContext::load(user, &sess, flash).await?,
    })
}

pub async fn signup(
    State(state): State<AppState>,
    sess: Session,
    Form(form): Form<SignupForm>,
) -> Result<Redirect, AppError> {
    let role = match form.role.as_deref() {
        Some("seller") => Role::Seller,
        _ => Role::Customer,
    };

    let auth = AuthService::new(state.store());
    match auth.signup(&form.name, &form.email, &form.password, role).await {
        Ok(user) => {
            state.notifier().user_signed_up(&user).await;
            session::sign_in(&sess, &CurrentUser::from(&user)).await?;
            Ok(Redirect::to("/dashboard"))
        }
        Err(err) => Ok(redirect_with_error("/signup", &err.to_string())),
    }
}

pub async fn logout(sess: Session) -> Result<Redirect, AppError> {
    session::sign_out(&sess).await?;
    Ok(Redirect::to("/"))
}
