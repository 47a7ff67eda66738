//! Seller surfaces: listing management and ownership checks.

use book_bazaar_integration_tests::TestApp;

#[tokio::test]
async fn test_new_listing_shows_up_in_the_catalog() {
    let app = TestApp::seeded().await;
    let mut seller = app.client();
    seller
        .login("seller_demo@example.com", "seller_demo@example.com")
        .await;

    seller
        .post_form(
            "/seller/books/add",
            &[
                ("title", "The Rust Programming Language"),
                ("author", "Steve Klabnik"),
                ("price", "39.99"),
                ("genre", "Programming"),
                ("summary", "The book on Rust."),
                ("cover_url", ""),
                ("stock", "4"),
            ],
        )
        .await
        .assert_redirects_to("/seller/books");

    let listings = seller.get("/seller/books").await;
    assert!(listings.body.contains("The Rust Programming Language"));

    let catalog = app.client().get("/").await;
    assert!(catalog.body.contains("The Rust Programming Language"));
    assert!(catalog.body.contains("$39.99"));
}

#[tokio::test]
async fn test_listing_requires_title_and_valid_price() {
    let app = TestApp::seeded().await;
    let mut seller = app.client();
    seller
        .login("seller_demo@example.com", "seller_demo@example.com")
        .await;

    let missing_title = seller
        .post_form(
            "/seller/books/add",
            &[
                ("title", "  "),
                ("author", "Nobody"),
                ("price", "5.00"),
                ("genre", "Fiction"),
                ("stock", "1"),
            ],
        )
        .await;
    missing_title.assert_redirects_to("/seller/books/add");
    assert!(missing_title.location.unwrap().contains("error="));

    let bad_price = seller
        .post_form(
            "/seller/books/add",
            &[
                ("title", "Priceless"),
                ("author", "Nobody"),
                ("price", "a lot"),
                ("genre", "Fiction"),
                ("stock", "1"),
            ],
        )
        .await;
    bad_price.assert_redirects_to("/seller/books/add");
    assert!(bad_price.location.unwrap().contains("error="));
}

#[tokio::test]
async fn test_editing_a_listing_changes_price_and_stock() {
    let app = TestApp::seeded().await;
    let mut seller = app.client();
    seller
        .login("seller_demo@example.com", "seller_demo@example.com")
        .await;

    seller
        .post_form(
            "/seller/books/7/edit",
            &[
                ("title", "Demo: Learning Flask"),
                ("author", "Demo Author"),
                ("price", "8.50"),
                ("genre", "Programming"),
                ("summary", "Updated edition."),
                ("cover_url", ""),
                ("stock", "12"),
            ],
        )
        .await
        .assert_redirects_to("/seller/books");

    let detail = app.client().get("/books/7").await;
    assert!(detail.body.contains("$8.50"));
    assert!(detail.body.contains("12 in stock"));
    assert!(detail.body.contains("Updated edition."));
}

#[tokio::test]
async fn test_sellers_cannot_manage_other_listings() {
    let app = TestApp::seeded().await;
    let mut seller = app.client();
    seller
        .login("seller_demo@example.com", "seller_demo@example.com")
        .await;

    // Book 1 belongs to another seller.
    let response = seller.post_form("/seller/books/1/delete", &[]).await;
    response.assert_redirects_to("/seller/books");
    assert!(response.location.unwrap().contains("error="));

    assert!(app.client().get("/").await.body.contains("The Great Gatsby"));
}

#[tokio::test]
async fn test_deleting_a_listing_removes_it_from_the_catalog() {
    let app = TestApp::seeded().await;
    let mut seller = app.client();
    seller
        .login("seller_demo@example.com", "seller_demo@example.com")
        .await;

    seller
        .post_form("/seller/books/8/delete", &[])
        .await
        .assert_redirects_to("/seller/books");

    assert!(!app.client().get("/").await.body.contains("Demo: Web UI Design"));
}

#[tokio::test]
async fn test_seller_dashboard_shows_headline_numbers() {
    let app = TestApp::seeded().await;
    let mut seller = app.client();
    seller
        .login("seller_demo@example.com", "seller_demo@example.com")
        .await;

    let dashboard = seller.get("/seller").await;
    // Two listings, one pending order worth $37.00.
    assert!(dashboard.body.contains("2</span> listings"));
    assert!(dashboard.body.contains("1</span> orders to ship"));
    assert!(dashboard.body.contains("$37.00"));
    assert!(dashboard.body.contains("ORD-DEMO-1-seller_demo@example.com"));
}
