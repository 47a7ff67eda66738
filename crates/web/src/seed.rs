//! Demo data for local runs, loaded when `BOOKBAZAAR_SEED=true`.
//!
//! Every seeded account's password is its own email address.

use book_bazaar_core::{BookId, Email, OrderId, OrderStatus, Role};
use chrono::Utc;
use rust_decimal::Decimal;

use crate::error::AppError;
use crate::models::order::SnapshotSellerPart;
use crate::models::{Book, NewUser, Order, OrderItem, OrderSnapshot, DEFAULT_COVER_URL};
use crate::services::auth::hash_password;
use crate::store::Store;

const ADMIN_EMAIL: &str = "admin@bookbazaar.com";
const DEMO_SELLER_EMAIL: &str = "seller_demo@example.com";
const DEMO_BUYER_EMAIL: &str = "buyer_demo@example.com";

struct SeedBook {
    id: &'static str,
    title: &'static str,
    author: &'static str,
    summary: &'static str,
    seller_name: &'static str,
    seller_email: &'static str,
    price: &'static str,
    genre: &'static str,
    cover_url: &'static str,
    stock: u32,
}

const SEED_BOOKS: &[SeedBook] = &[
    SeedBook {
        id: "1",
        title: "The Great Gatsby",
        author: "F. Scott Fitzgerald",
        summary: "A classic novel of the Jazz Age that tells the story of the mysteriously wealthy Jay Gatsby and his love for Daisy Buchanan.",
        seller_name: "ClassicBooks Co.",
        seller_email: "classic@bookseller.example.com",
        price: "10.99",
        genre: "Fiction",
        cover_url: DEFAULT_COVER_URL,
        stock: 10,
    },
    SeedBook {
        id: "2",
        title: "1984",
        author: "George Orwell",
        summary: "A dystopian social science fiction novel and cautionary tale about surveillance and totalitarianism.",
        seller_name: "Dystopia Books",
        seller_email: "sales@dystopiabooks.example.com",
        price: "8.99",
        genre: "Sci-Fi",
        cover_url: DEFAULT_COVER_URL,
        stock: 10,
    },
    SeedBook {
        id: "3",
        title: "The Hobbit",
        author: "J.R.R. Tolkien",
        summary: "Bilbo Baggins embarks on a grand adventure with a group of dwarves to reclaim their mountain home.",
        seller_name: "MiddleEarth Books",
        seller_email: "hobbit@middleearth.example.com",
        price: "12.99",
        genre: "Sci-Fi",
        cover_url: DEFAULT_COVER_URL,
        stock: 10,
    },
    SeedBook {
        id: "4",
        title: "Clean Code",
        author: "Robert C. Martin",
        summary: "A handbook of agile software craftsmanship, focusing on writing readable, maintainable code.",
        seller_name: "TechReads",
        seller_email: "support@techreads.example.com",
        price: "29.99",
        genre: "Non-Fiction",
        cover_url: DEFAULT_COVER_URL,
        stock: 10,
    },
    SeedBook {
        id: "5",
        title: "Design Patterns",
        author: "Gang of Four",
        summary: "Elements of reusable object-oriented software, the classic reference for software design patterns.",
        seller_name: "Patterns Shop",
        seller_email: "info@patternsshop.example.com",
        price: "35.50",
        genre: "Non-Fiction",
        cover_url: DEFAULT_COVER_URL,
        stock: 10,
    },
    SeedBook {
        id: "6",
        title: "The Alchemist",
        author: "Paulo Coelho",
        summary: "A philosophical tale about following your dreams and listening to your heart on the journey of life.",
        seller_name: "Inspirations Ltd",
        seller_email: "hello@inspirations.example.com",
        price: "9.99",
        genre: "Fiction",
        cover_url: DEFAULT_COVER_URL,
        stock: 10,
    },
    SeedBook {
        id: "7",
        title: "Demo: Learning Flask",
        author: "Demo Author",
        summary: "A short demo book about building small web apps.",
        seller_name: "Demo Seller",
        seller_email: DEMO_SELLER_EMAIL,
        price: "7.00",
        genre: "Programming",
        cover_url: "https://placehold.co/150x220/e0e0e0/333333?text=Flask",
        stock: 5,
    },
    SeedBook {
        id: "8",
        title: "Demo: Web UI Design",
        author: "Design Demo",
        summary: "A demo book about designing simple web UIs.",
        seller_name: "Demo Seller",
        seller_email: DEMO_SELLER_EMAIL,
        price: "15.00",
        genre: "Design",
        cover_url: "https://placehold.co/150x220/e0e0e0/333333?text=Design",
        stock: 5,
    },
];

/// Populate the store with the demo catalog, accounts, and one placed
/// order. Idempotent only in the sense that duplicate accounts are
/// skipped; meant for a fresh in-memory store.
///
/// # Errors
///
/// Returns an error if hashing or a repository write fails.
pub async fn seed_demo_data(store: &Store) -> Result<(), AppError> {
    let now = Utc::now();

    seed_user(store, ADMIN_EMAIL, "Administrator", Role::Admin).await?;

    for seed in SEED_BOOKS {
        seed_user(store, seed.seller_email, seed.seller_name, Role::Seller).await?;

        let price: Decimal = seed
            .price
            .parse()
            .map_err(|_| AppError::Internal(format!("bad seed price for {}", seed.title)))?;
        let seller_email = Email::parse(seed.seller_email)
            .map_err(|e| AppError::Internal(format!("bad seed email: {e}")))?;

        store
            .books()
            .insert(Book {
                id: BookId::new(seed.id),
                title: seed.title.to_owned(),
                author: seed.author.to_owned(),
                price,
                genre: seed.genre.to_owned(),
                summary: seed.summary.to_owned(),
                cover_url: seed.cover_url.to_owned(),
                stock: seed.stock,
                seller_name: seed.seller_name.to_owned(),
                seller_email,
                created_at: now,
            })
            .await;
    }

    seed_user(store, DEMO_BUYER_EMAIL, "Demo Buyer", Role::Customer).await?;
    seed_demo_order(store).await?;

    tracing::info!(
        books = SEED_BOOKS.len(),
        "demo data loaded; seeded passwords equal the account email"
    );
    Ok(())
}

async fn seed_user(store: &Store, email: &str, name: &str, role: Role) -> Result<(), AppError> {
    let parsed = Email::parse(email).map_err(|e| AppError::Internal(format!("bad seed email: {e}")))?;
    if store.users().find_by_email(&parsed).await.is_some() {
        return Ok(());
    }

    let password_hash = hash_password(email)?;
    store
        .users()
        .create(NewUser {
            email: parsed,
            name: name.to_owned(),
            password_hash,
            role,
        })
        .await?;
    Ok(())
}

/// One placed order from the demo buyer to the demo seller, covering both
/// demo books, mirrored into the buyer's snapshot history.
async fn seed_demo_order(store: &Store) -> Result<(), AppError> {
    let order_id = "ORD-DEMO-1";
    let buyer_email = Email::parse(DEMO_BUYER_EMAIL)
        .map_err(|e| AppError::Internal(format!("bad seed email: {e}")))?;
    let seller_email = Email::parse(DEMO_SELLER_EMAIL)
        .map_err(|e| AppError::Internal(format!("bad seed email: {e}")))?;

    let items = vec![
        OrderItem {
            book_id: BookId::new("7"),
            title: "Demo: Learning Flask".to_owned(),
            author: "Demo Author".to_owned(),
            price: Decimal::new(700, 2),
            quantity: 1,
        },
        OrderItem {
            book_id: BookId::new("8"),
            title: "Demo: Web UI Design".to_owned(),
            author: "Design Demo".to_owned(),
            price: Decimal::new(1500, 2),
            quantity: 2,
        },
    ];
    let total: Decimal = items.iter().map(OrderItem::line_total).sum();
    let shipping_address = "123 Demo Lane, Demo City, 00000 Demo";
    let record_id = OrderId::new(format!("{order_id}-{DEMO_SELLER_EMAIL}"));
    if store.orders().find(&record_id).await.is_some() {
        return Ok(());
    }
    let placed_at = Utc::now();

    store
        .orders()
        .insert(Order {
            id: record_id.clone(),
            original_order_id: OrderId::new(order_id),
            buyer_email: buyer_email.clone(),
            buyer_name: "Demo Buyer".to_owned(),
            seller_email: seller_email.clone(),
            seller_name: "Demo Seller".to_owned(),
            status: OrderStatus::Placed,
            items: items.clone(),
            total,
            shipping_address: shipping_address.to_owned(),
            created_at: placed_at,
        })
        .await;

    store
        .users()
        .push_order_snapshot(
            &buyer_email,
            OrderSnapshot {
                order_id: order_id.to_owned(),
                placed_at,
                shipping_address: shipping_address.to_owned(),
                parts: vec![SnapshotSellerPart {
                    order_record_id: record_id,
                    seller_name: "Demo Seller".to_owned(),
                    seller_email,
                    status: OrderStatus::Placed,
                    items,
                    total,
                }],
            },
        )
        .await?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_loads_catalog_accounts_and_demo_order() {
        let store = Store::new();
        seed_demo_data(&store).await.unwrap();

        assert_eq!(store.books().count().await, 8);
        assert_eq!(store.orders().count().await, 1);
        // Admin, 7 distinct sellers, demo buyer.
        assert_eq!(store.users().count().await, 9);

        let buyer = store
            .users()
            .get(&Email::parse(DEMO_BUYER_EMAIL).unwrap())
            .await
            .unwrap();
        assert_eq!(buyer.orders.len(), 1);
        assert_eq!(buyer.orders[0].order_id, "ORD-DEMO-1");
        assert_eq!(buyer.orders[0].total(), Decimal::new(3700, 2));
    }

    #[tokio::test]
    async fn test_seed_is_safe_to_rerun() {
        let store = Store::new();
        seed_demo_data(&store).await.unwrap();
        seed_demo_data(&store).await.unwrap();

        assert_eq!(store.users().count().await, 9);
        assert_eq!(store.books().count().await, 8);
    }
}
