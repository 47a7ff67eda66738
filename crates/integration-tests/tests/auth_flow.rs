//! Signup, login, logout, and access control.

use axum::http::StatusCode;
use book_bazaar_integration_tests::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_signup_logs_in_and_lands_on_dashboard() {
    let app = TestApp::new();
    let mut client = app.client();

    let response = client
        .post_form(
            "/signup",
            &[
                ("name", "Ada Lovelace"),
                ("email", "ada@example.com"),
                ("password", "hunter22"),
                ("role", "customer"),
            ],
        )
        .await;
    response.assert_redirects_to("/dashboard");

    let dashboard = client.get("/dashboard").await;
    assert_eq!(dashboard.status, StatusCode::OK);
    assert!(dashboard.body.contains("Welcome back"));
    assert!(dashboard.body.contains("Ada Lovelace"));
}

#[tokio::test]
async fn test_signup_rejects_duplicate_email() {
    let app = TestApp::seeded().await;
    let mut client = app.client();

    let response = client
        .post_form(
            "/signup",
            &[
                ("name", "Impostor"),
                ("email", "buyer_demo@example.com"),
                ("password", "hunter22"),
                ("role", "customer"),
            ],
        )
        .await;

    response.assert_redirects_to("/signup");
    assert!(response.location.unwrap().contains("error="));
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let app = TestApp::seeded().await;
    let mut client = app.client();

    let response = client
        .post_form(
            "/login",
            &[("email", "buyer_demo@example.com"), ("password", "nope")],
        )
        .await;

    response.assert_redirects_to("/login");
    assert!(response.location.unwrap().contains("error="));
}

#[tokio::test]
async fn test_protected_pages_redirect_anonymous_to_login() {
    let app = TestApp::seeded().await;

    for path in ["/cart", "/wishlist", "/orders", "/payment", "/profile"] {
        let response = app.client().get(path).await;
        response.assert_redirects_to("/login");
        assert!(
            response.location.unwrap().contains("next="),
            "{path} should carry a next param"
        );
    }
}

#[tokio::test]
async fn test_api_rejects_anonymous_with_json_401() {
    let app = TestApp::seeded().await;
    let mut client = app.client();

    let response = client
        .post_json("/api/chatbot", &json!({ "message": "hello" }))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json()["error"], "Please log in first");

    // The same contract holds across the JSON surface, not just the chatbot.
    let wishlist = client
        .post_json("/api/chatbot/add-to-wishlist", &json!({ "book_id": "2" }))
        .await;
    assert_eq!(wishlist.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wishlist.json()["error"], "Please log in first");

    let count = app.client().get("/api/cart/count").await;
    assert_eq!(count.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_role_gates() {
    let app = TestApp::seeded().await;

    let mut buyer = app.client();
    buyer
        .login("buyer_demo@example.com", "buyer_demo@example.com")
        .await;
    assert_eq!(buyer.get("/seller").await.status, StatusCode::FORBIDDEN);
    assert_eq!(buyer.get("/admin").await.status, StatusCode::FORBIDDEN);

    let mut seller = app.client();
    seller
        .login("seller_demo@example.com", "seller_demo@example.com")
        .await;
    assert_eq!(seller.get("/admin").await.status, StatusCode::FORBIDDEN);

    // Admins do not get the seller surface either.
    let mut admin = app.client();
    admin
        .login("admin@bookbazaar.com", "admin@bookbazaar.com")
        .await;
    assert_eq!(admin.get("/seller").await.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_logout_clears_the_session() {
    let app = TestApp::seeded().await;
    let mut client = app.client();
    client
        .login("buyer_demo@example.com", "buyer_demo@example.com")
        .await;

    assert_eq!(client.get("/cart").await.status, StatusCode::OK);

    let response = client.post_form("/logout", &[]).await;
    response.assert_redirects_to("/");

    client.get("/cart").await.assert_redirects_to("/login");
}

#[tokio::test]
async fn test_dashboard_redirects_by_role() {
    let app = TestApp::seeded().await;

    let mut seller = app.client();
    seller
        .login("seller_demo@example.com", "seller_demo@example.com")
        .await;
    seller.get("/dashboard").await.assert_redirects_to("/seller");

    let mut admin = app.client();
    admin
        .login("admin@bookbazaar.com", "admin@bookbazaar.com")
        .await;
    admin.get("/dashboard").await.assert_redirects_to("/admin");
}
