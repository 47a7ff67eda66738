//! End-to-end tests for BookBazaar.
//!
//! The full router is driven in-process with `tower::ServiceExt::oneshot`,
//! so tests need no running server and no network. Each [`TestClient`]
//! keeps its own cookie jar, which makes multi-actor flows (buyer places,
//! seller ships, buyer sees the change) straightforward.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use book_bazaar_web::config::AppConfig;
use book_bazaar_web::state::AppState;
use book_bazaar_web::{app, seed};
use tower::ServiceExt;

/// A shared application instance. Clients cloned from it see the same
/// store and session layer.
pub struct TestApp {
    router: Router,
}

impl TestApp {
    /// Fresh app with an empty store.
    #[must_use]
    pub fn new() -> Self {
        let state = AppState::new(test_config());
        Self { router: app(state) }
    }

    /// App preloaded with the demo catalog, accounts, and order.
    pub async fn seeded() -> Self {
        let state = AppState::new(test_config());
        seed::seed_demo_data(state.store())
            .await
            .expect("seeding failed");
        Self { router: app(state) }
    }

    /// A client with its own cookie jar against this app.
    #[must_use]
    pub fn client(&self) -> TestClient {
        TestClient {
            router: self.router.clone(),
            cookies: Vec::new(),
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_owned(),
        port: 0,
        base_url: "http://127.0.0.1:5000".to_owned(),
        seed: false,
        inference_model: "Qwen/Qwen2.5-72B-Instruct".to_owned(),
        inference_base_url: "https://router.huggingface.co/v1".to_owned(),
        // No key: the assistant must answer from its fallback rules.
        inference_api_key: None,
        notify_webhook_url: None,
    }
}

/// One browser-like actor: requests carry the cookies set so far.
pub struct TestClient {
    router: Router,
    cookies: Vec<String>,
}

/// A finished response, body already collected.
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl TestResponse {
    /// The response body parsed as JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("response body was not JSON")
    }

    /// Assert this is a redirect to `path` (ignoring any query string).
    pub fn assert_redirects_to(&self, path: &str) {
        assert_eq!(self.status, StatusCode::SEE_OTHER, "body: {}", self.body);
        let location = self.location.as_deref().expect("missing Location header");
        let target = location.split('?').next().unwrap_or(location);
        assert_eq!(target, path, "full location: {location}");
    }
}

impl TestClient {
    pub async fn get(&mut self, path: &str) -> TestResponse {
        self.request(Method::GET, path, None, None).await
    }

    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        self.request(
            Method::POST,
            path,
            Some("application/x-www-form-urlencoded"),
            Some(body),
        )
        .await
    }

    pub async fn post_json(&mut self, path: &str, payload: &serde_json::Value) -> TestResponse {
        self.request(
            Method::POST,
            path,
            Some("application/json"),
            Some(payload.to_string()),
        )
        .await
    }

    /// Log in through the real form endpoint and follow the cookie.
    pub async fn login(&mut self, email: &str, password: &str) {
        let response = self
            .post_form("/login", &[("email", email), ("password", password)])
            .await;
        assert_eq!(
            response.status,
            StatusCode::SEE_OTHER,
            "login failed for {email}"
        );
        let location = response.location.as_deref().unwrap_or("");
        assert!(
            !location.contains("error="),
            "login rejected for {email}: {location}"
        );
    }

    async fn request(
        &mut self,
        method: Method,
        path: &str,
        content_type: Option<&str>,
        body: Option<String>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(content_type) = content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        if !self.cookies.is_empty() {
            builder = builder.header(COOKIE, self.cookies.join("; "));
        }
        let request = builder
            .body(body.map_or_else(Body::empty, Body::from))
            .expect("failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router error");

        let status = response.status();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned);

        for set_cookie in response.headers().get_all(SET_COOKIE) {
            if let Ok(raw) = set_cookie.to_str() {
                if let Some(pair) = raw.split(';').next() {
                    self.store_cookie(pair.trim());
                }
            }
        }

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        let body = String::from_utf8_lossy(&bytes).into_owned();

        TestResponse {
            status,
            location,
            body,
        }
    }

    fn store_cookie(&mut self, pair: &str) {
        let Some(name) = pair.split('=').next() else {
            return;
        };
        self.cookies
            .retain(|existing| existing.split('=').next() != Some(name));
        self.cookies.push(pair.to_owned());
    }
}
