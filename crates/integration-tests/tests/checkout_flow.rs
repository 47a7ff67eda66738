//! Cart to checkout: stock validation, per-seller fan-out, status sync.

use axum::http::StatusCode;
use book_bazaar_integration_tests::TestApp;

#[tokio::test]
async fn test_checkout_decrements_stock_and_records_the_order() {
    let app = TestApp::seeded().await;
    let mut buyer = app.client();
    buyer
        .login("buyer_demo@example.com", "buyer_demo@example.com")
        .await;

    let before = buyer.get("/books/1").await;
    assert!(before.body.contains("10 in stock"));

    buyer
        .post_form("/cart/add", &[("book_id", "1"), ("quantity", "2")])
        .await
        .assert_redirects_to("/cart");

    let cart = buyer.get("/cart").await;
    assert!(cart.body.contains("The Great Gatsby"));
    assert!(cart.body.contains("$21.98"));

    buyer
        .post_form("/payment", &[("address", "1 Main St, Springfield")])
        .await
        .assert_redirects_to("/orders");

    // Stock went down, the cart is empty, and the order is on record.
    assert!(buyer.get("/books/1").await.body.contains("8 in stock"));
    assert!(buyer.get("/cart").await.body.contains("Your cart is empty"));

    let orders = buyer.get("/orders").await;
    assert!(orders.body.contains("$21.98"));
    assert!(orders.body.contains("Placed"));
}

#[tokio::test]
async fn test_checkout_rejects_orders_over_available_stock() {
    let app = TestApp::seeded().await;
    let mut buyer = app.client();
    buyer
        .login("buyer_demo@example.com", "buyer_demo@example.com")
        .await;

    // Book 7 only has 5 in stock.
    buyer
        .post_form("/cart/add", &[("book_id", "7"), ("quantity", "9")])
        .await
        .assert_redirects_to("/cart");

    let response = buyer
        .post_form("/payment", &[("address", "1 Main St")])
        .await;
    response.assert_redirects_to("/payment");
    assert!(response.location.unwrap().contains("error="));

    // Nothing was written.
    assert!(buyer.get("/books/7").await.body.contains("5 in stock"));
}

#[tokio::test]
async fn test_cart_spanning_sellers_produces_one_record_per_seller() {
    let app = TestApp::seeded().await;
    let mut buyer = app.client();
    buyer
        .login("buyer_demo@example.com", "buyer_demo@example.com")
        .await;

    buyer
        .post_form("/cart/add", &[("book_id", "1"), ("quantity", "1")])
        .await;
    buyer
        .post_form("/cart/add", &[("book_id", "2"), ("quantity", "1")])
        .await;
    buyer
        .post_form("/payment", &[("address", "1 Main St")])
        .await
        .assert_redirects_to("/orders");

    // Both per-seller records exist, ids suffixed with the seller email.
    let mut admin = app.client();
    admin
        .login("admin@bookbazaar.com", "admin@bookbazaar.com")
        .await;
    let records = admin.get("/admin/orders").await;
    assert!(records.body.contains("-classic@bookseller.example.com"));
    assert!(records.body.contains("-sales@dystopiabooks.example.com"));

    // The buyer sees it as a single purchase with both sellers.
    let orders = buyer.get("/orders").await;
    assert!(orders.body.contains("ClassicBooks Co.: Placed"));
    assert!(orders.body.contains("Dystopia Books: Placed"));
}

#[tokio::test]
async fn test_seller_status_change_reaches_the_buyer() {
    let app = TestApp::seeded().await;

    let mut seller = app.client();
    seller
        .login("seller_demo@example.com", "seller_demo@example.com")
        .await;
    let received = seller.get("/seller/orders").await;
    assert!(received.body.contains("ORD-DEMO-1-seller_demo@example.com"));

    seller
        .post_form(
            "/seller/orders/ORD-DEMO-1-seller_demo@example.com/status",
            &[("status", "Shipped")],
        )
        .await
        .assert_redirects_to("/seller/orders");

    let mut buyer = app.client();
    buyer
        .login("buyer_demo@example.com", "buyer_demo@example.com")
        .await;
    assert!(buyer.get("/orders").await.body.contains("Shipped"));

    let detail = buyer.get("/orders/ORD-DEMO-1").await;
    assert_eq!(detail.status, StatusCode::OK);
    assert!(detail.body.contains("Shipped"));
}

#[tokio::test]
async fn test_sellers_cannot_touch_each_others_orders() {
    let app = TestApp::seeded().await;
    let mut other_seller = app.client();
    other_seller
        .login(
            "classic@bookseller.example.com",
            "classic@bookseller.example.com",
        )
        .await;

    let response = other_seller
        .post_form(
            "/seller/orders/ORD-DEMO-1-seller_demo@example.com/status",
            &[("status", "Cancelled")],
        )
        .await;
    response.assert_redirects_to("/seller/orders");
    assert!(response.location.unwrap().contains("error="));

    // The order is untouched.
    let mut seller = app.client();
    seller
        .login("seller_demo@example.com", "seller_demo@example.com")
        .await;
    assert!(seller.get("/seller/orders").await.body.contains("Placed"));
}
