//! Chat assistant over HTTP. No inference key is configured in tests, so
//! every reply comes from the rule-based fallback.

use axum::http::StatusCode;
use book_bazaar_integration_tests::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_recommendations_come_with_three_books() {
    let app = TestApp::seeded().await;
    let mut buyer = app.client();
    buyer
        .login("buyer_demo@example.com", "buyer_demo@example.com")
        .await;

    let response = buyer
        .post_json("/api/chatbot", &json!({ "message": "can you recommend a book for me?" }))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let reply = response.json();
    assert_eq!(reply["source"], "system");
    assert_eq!(reply["books"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn test_catalog_count_question() {
    let app = TestApp::seeded().await;
    let mut buyer = app.client();
    buyer
        .login("buyer_demo@example.com", "buyer_demo@example.com")
        .await;

    let reply = buyer
        .post_json("/api/chatbot", &json!({ "message": "how many books do you sell?" }))
        .await
        .json();
    assert!(reply["response"].as_str().is_some_and(|s| s.contains('8')));
}

#[tokio::test]
async fn test_navigation_hints() {
    let app = TestApp::seeded().await;
    let mut buyer = app.client();
    buyer
        .login("buyer_demo@example.com", "buyer_demo@example.com")
        .await;

    let wishlist = buyer
        .post_json("/api/chatbot", &json!({ "message": "open my wishlist please" }))
        .await
        .json();
    assert_eq!(wishlist["actions"], json!(["view_wishlist"]));

    let orders = buyer
        .post_json("/api/chatbot", &json!({ "message": "has my order shipped yet? any update?" }))
        .await
        .json();
    assert_eq!(orders["actions"], json!(["view_orders"]));
}

#[tokio::test]
async fn test_title_lookup_finds_the_book() {
    let app = TestApp::seeded().await;
    let mut buyer = app.client();
    buyer
        .login("buyer_demo@example.com", "buyer_demo@example.com")
        .await;

    let reply = buyer
        .post_json("/api/chatbot", &json!({ "message": "do you have 1984?" }))
        .await
        .json();
    assert_eq!(reply["books"][0]["title"], "1984");
}

#[tokio::test]
async fn test_add_to_wishlist_flow() {
    let app = TestApp::seeded().await;
    let mut buyer = app.client();
    buyer
        .login("buyer_demo@example.com", "buyer_demo@example.com")
        .await;

    let reply = buyer
        .post_json("/api/chatbot", &json!({ "message": "please add 1984 to my wishlist" }))
        .await
        .json();
    assert_eq!(reply["actions"], json!(["add_to_wishlist"]));
    assert_eq!(reply["books"][0]["title"], "1984");

    let saved = buyer
        .post_json("/api/chatbot/add-to-wishlist", &json!({ "book_id": "2" }))
        .await
        .json();
    assert_eq!(saved["added"], true);
    assert_eq!(saved["wishlist_count"], 1);

    assert!(buyer.get("/wishlist").await.body.contains("1984"));
}

#[tokio::test]
async fn test_book_endpoint_returns_the_record() {
    let app = TestApp::seeded().await;

    let book = app.client().get("/api/books/2").await;
    assert_eq!(book.status, StatusCode::OK);
    assert_eq!(book.json()["title"], "1984");

    let missing = app.client().get("/api/books/999").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cart_count_endpoint_tracks_the_session() {
    let app = TestApp::seeded().await;
    let mut buyer = app.client();
    buyer
        .login("buyer_demo@example.com", "buyer_demo@example.com")
        .await;

    assert_eq!(buyer.get("/api/cart/count").await.json()["count"], 0);

    buyer
        .post_form("/cart/add", &[("book_id", "2"), ("quantity", "3")])
        .await;

    assert_eq!(buyer.get("/api/cart/count").await.json()["count"], 3);
}
