//! Admin surfaces: overview numbers, account management, and overrides.

use axum::http::StatusCode;
use book_bazaar_integration_tests::TestApp;

#[tokio::test]
async fn test_overview_reflects_the_seeded_store() {
    let app = TestApp::seeded().await;
    let mut admin = app.client();
    admin
        .login("admin@bookbazaar.com", "admin@bookbazaar.com")
        .await;

    let dashboard = admin.get("/admin").await;
    assert!(dashboard.body.contains("9</span> accounts"));
    assert!(dashboard.body.contains("7</span> sellers"));
    assert!(dashboard.body.contains("8</span> books"));
    assert!(dashboard.body.contains("1</span> order records"));
    assert!(dashboard.body.contains("$37.00"));
}

#[tokio::test]
async fn test_account_detail_shows_purchases_and_listings() {
    let app = TestApp::seeded().await;
    let mut admin = app.client();
    admin
        .login("admin@bookbazaar.com", "admin@bookbazaar.com")
        .await;

    let buyer = admin.get("/admin/users/buyer_demo%40example.com").await;
    assert_eq!(buyer.status, StatusCode::OK);
    assert!(buyer.body.contains("Demo Buyer"));
    assert!(buyer.body.contains("ORD-DEMO-1"));
    assert!(buyer.body.contains("$37.00"));

    let seller = admin.get("/admin/users/seller_demo%40example.com").await;
    assert!(seller.body.contains("Demo: Learning Flask"));
    assert!(seller.body.contains("Demo: Web UI Design"));
}

#[tokio::test]
async fn test_deleting_a_seller_removes_their_listings() {
    let app = TestApp::seeded().await;
    let mut admin = app.client();
    admin
        .login("admin@bookbazaar.com", "admin@bookbazaar.com")
        .await;

    admin
        .post_form("/admin/users/seller_demo%40example.com/delete", &[])
        .await
        .assert_redirects_to("/admin/users");

    assert!(!admin.get("/admin/users").await.body.contains("seller_demo@example.com"));

    let catalog = app.client().get("/").await;
    assert!(!catalog.body.contains("Demo: Learning Flask"));
    assert!(!catalog.body.contains("Demo: Web UI Design"));
}

#[tokio::test]
async fn test_admins_cannot_delete_their_own_account() {
    let app = TestApp::seeded().await;
    let mut admin = app.client();
    admin
        .login("admin@bookbazaar.com", "admin@bookbazaar.com")
        .await;

    let response = admin
        .post_form("/admin/users/admin%40bookbazaar.com/delete", &[])
        .await;
    response.assert_redirects_to("/admin/users");
    assert!(response.location.unwrap().contains("error="));
    assert!(admin.get("/admin/users").await.body.contains("admin@bookbazaar.com"));
}

#[tokio::test]
async fn test_account_list_filters_by_role_and_search() {
    let app = TestApp::seeded().await;
    let mut admin = app.client();
    admin
        .login("admin@bookbazaar.com", "admin@bookbazaar.com")
        .await;

    let sellers_only = admin.get("/admin/users?role=seller").await;
    assert!(sellers_only.body.contains("classic@bookseller.example.com"));
    assert!(!sellers_only.body.contains("buyer_demo@example.com"));

    let search = admin.get("/admin/users?q=demo+buyer").await;
    assert!(search.body.contains("buyer_demo@example.com"));
    assert!(!search.body.contains("classic@bookseller.example.com"));
}

#[tokio::test]
async fn test_catalog_filters_by_genre() {
    let app = TestApp::seeded().await;
    let mut admin = app.client();
    admin
        .login("admin@bookbazaar.com", "admin@bookbazaar.com")
        .await;

    let filtered = admin.get("/admin/books?genre=Programming").await;
    assert!(filtered.body.contains("Demo: Learning Flask"));
    assert!(!filtered.body.contains("The Great Gatsby"));
}

#[tokio::test]
async fn test_admin_can_edit_any_listing() {
    let app = TestApp::seeded().await;
    let mut admin = app.client();
    admin
        .login("admin@bookbazaar.com", "admin@bookbazaar.com")
        .await;

    let form = admin.get("/admin/books/1/edit").await;
    assert_eq!(form.status, StatusCode::OK);
    assert!(form.body.contains("The Great Gatsby"));

    admin
        .post_form(
            "/admin/books/1/edit",
            &[
                ("title", "The Great Gatsby"),
                ("author", "F. Scott Fitzgerald"),
                ("price", "11.50"),
                ("genre", "Fiction"),
                ("summary", "Jazz age tragedy."),
                ("stock", "10"),
            ],
        )
        .await
        .assert_redirects_to("/admin/books");

    let page = app.client().get("/books/1").await;
    assert!(page.body.contains("$11.50"));
    assert!(page.body.contains("Jazz age tragedy."));
}

#[tokio::test]
async fn test_removing_an_order_line_recomputes_totals() {
    let app = TestApp::seeded().await;
    let mut admin = app.client();
    admin
        .login("admin@bookbazaar.com", "admin@bookbazaar.com")
        .await;

    let detail = admin
        .get("/admin/orders/ORD-DEMO-1-seller_demo@example.com")
        .await;
    assert_eq!(detail.status, StatusCode::OK);
    assert!(detail.body.contains("Demo: Learning Flask"));
    assert!(detail.body.contains("$37.00"));

    admin
        .post_form(
            "/admin/orders/ORD-DEMO-1-seller_demo@example.com/items/7/remove",
            &[],
        )
        .await
        .assert_redirects_to("/admin/orders/ORD-DEMO-1-seller_demo@example.com");

    let detail = admin
        .get("/admin/orders/ORD-DEMO-1-seller_demo@example.com")
        .await;
    assert!(!detail.body.contains("Demo: Learning Flask"));
    assert!(detail.body.contains("$30.00"));

    // The buyer's order history reflects the new total.
    let mut buyer = app.client();
    buyer
        .login("buyer_demo@example.com", "buyer_demo@example.com")
        .await;
    assert!(buyer.get("/orders").await.body.contains("$30.00"));
}

#[tokio::test]
async fn test_admin_can_remove_any_listing() {
    let app = TestApp::seeded().await;
    let mut admin = app.client();
    admin
        .login("admin@bookbazaar.com", "admin@bookbazaar.com")
        .await;

    admin
        .post_form("/admin/books/1/delete", &[])
        .await
        .assert_redirects_to("/admin/books");

    assert!(!app.client().get("/").await.body.contains("The Great Gatsby"));
}

#[tokio::test]
async fn test_status_override_reaches_the_buyer() {
    let app = TestApp::seeded().await;
    let mut admin = app.client();
    admin
        .login("admin@bookbazaar.com", "admin@bookbazaar.com")
        .await;

    admin
        .post_form(
            "/admin/orders/ORD-DEMO-1-seller_demo@example.com/status",
            &[("status", "Delivered")],
        )
        .await
        .assert_redirects_to("/admin/orders");

    assert!(admin.get("/admin/orders").await.body.contains("Delivered"));

    let mut buyer = app.client();
    buyer
        .login("buyer_demo@example.com", "buyer_demo@example.com")
        .await;
    assert!(buyer.get("/orders").await.body.contains("Delivered"));
}

#[tokio::test]
async fn test_analytics_rolls_up_the_store() {
    let app = TestApp::seeded().await;
    let mut admin = app.client();
    admin
        .login("admin@bookbazaar.com", "admin@bookbazaar.com")
        .await;

    let analytics = admin.get("/admin/analytics").await;
    assert_eq!(analytics.status, StatusCode::OK);
    // One non-cancelled order, so revenue equals the average.
    assert!(analytics.body.contains("$37.00</span> revenue"));
    assert!(analytics.body.contains("$37.00</span> average order value"));
    assert!(analytics.body.contains("Placed"));
    assert!(analytics.body.contains("Programming"));
    assert!(analytics.body.contains("Non-Fiction"));
}
