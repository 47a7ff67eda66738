//! Rule-based fallback replies.
//!
//! Keyword matching over the lowercased message, checked in a fixed order.
//! Always answers; the last arm is a generic help message.

use crate::models::Book;

use super::types::{BookCard, ChatReply};

pub(super) fn reply(message: &str, books: &[Book]) -> ChatReply {
    let text = message.trim().to_lowercase();

    if text.is_empty() {
        return ChatReply::system("Say something like \"recommend a book\" or \"do you have sci-fi?\" and I'll take it from there.");
    }

    if contains_any(&text, &["hi", "hello", "hey"]) && text.len() <= 24 {
        return ChatReply::system(
            "Hello! I can recommend books, search the catalog, or point you at your cart, wishlist, and orders.",
        );
    }

    if contains_any(&text, &["thank", "thanks"]) {
        return ChatReply::system("You're welcome. Happy reading!");
    }

    if text.contains("how many") {
        return ChatReply::system(format!(
            "We currently have {} books in the catalog.",
            books.len()
        ));
    }

    if contains_any(&text, &["recommend", "suggest", "best seller", "popular"]) {
        let mut by_stock: Vec<&Book> = books.iter().filter(|b| b.in_stock()).collect();
        by_stock.sort_by(|a, b| b.stock.cmp(&a.stock));
        let picks: Vec<BookCard> = by_stock
            .into_iter()
            .take(ChatReply::MAX_BOOKS)
            .map(BookCard::from)
            .collect();
        if picks.is_empty() {
            return ChatReply::system("Everything is sold out right now. Check back soon!");
        }
        let names = picks
            .iter()
            .map(|c| c.title.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        return ChatReply::system(format!("Here are some picks for you: {names}."))
            .with_books(picks);
    }

    // Genre mention, matched against genres actually in the catalog.
    for book in books {
        let genre = book.genre.to_lowercase();
        if !genre.is_empty() && text.contains(&genre) {
            let matches: Vec<BookCard> = books
                .iter()
                .filter(|b| b.genre.eq_ignore_ascii_case(&book.genre))
                .take(ChatReply::MAX_BOOKS)
                .map(BookCard::from)
                .collect();
            return ChatReply::system(format!(
                "We have {} {} titles. Here are a few:",
                matches.len(),
                book.genre
            ))
            .with_books(matches);
        }
    }

    if contains_any(&text, &["order", "delivery", "shipped", "track"]) {
        return ChatReply::system(
            "You can follow every order and its status from your orders page.",
        )
        .with_action("view_orders");
    }

    if text.contains("cart") {
        return ChatReply::system("Your cart is one click away.").with_action("view_cart");
    }

    // "add X to my wishlist" style requests, matched against the catalog.
    if text.contains("wishlist") && contains_any(&text, &["add", "save", "put"]) {
        let matches: Vec<BookCard> = books
            .iter()
            .filter(|b| text.contains(&b.title.to_lowercase()))
            .take(ChatReply::MAX_BOOKS)
            .map(BookCard::from)
            .collect();
        if !matches.is_empty() {
            return ChatReply::system("Sure, saving that to your wishlist.")
                .with_books(matches)
                .with_action("add_to_wishlist");
        }
    }

    if text.contains("wishlist") {
        return ChatReply::system("Everything you saved is on your wishlist page.")
            .with_action("view_wishlist");
    }

    if contains_any(&text, &["search", "find", "looking for", "do you have"]) {
        let matches: Vec<BookCard> = books
            .iter()
            .filter(|b| {
                let title = b.title.to_lowercase();
                let author = b.author.to_lowercase();
                text.contains(&title) || text.contains(&author)
            })
            .take(ChatReply::MAX_BOOKS)
            .map(BookCard::from)
            .collect();
        if matches.is_empty() {
            return ChatReply::system(
                "I couldn't spot that title. Try the search bar on the home page for a broader look.",
            );
        }
        return ChatReply::system("Found it! Here's what we have:").with_books(matches);
    }

    // Bare title or author mention.
    let direct: Vec<BookCard> = books
        .iter()
        .filter(|b| {
            text.contains(&b.title.to_lowercase()) || text.contains(&b.author.to_lowercase())
        })
        .take(ChatReply::MAX_BOOKS)
        .map(BookCard::from)
        .collect();
    if !direct.is_empty() {
        return ChatReply::system("Here's what matches that:").with_books(direct);
    }

    ChatReply::system(
        "I can recommend books, check the catalog, or point you at your cart, wishlist, and orders. What would you like?",
    )
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::assistant::types::ChatSource;
    use crate::models::NewBook;
    use book_bazaar_core::Email;

    fn book(title: &str, genre: &str, stock: u32) -> Book {
        NewBook {
            title: title.to_owned(),
            author: "Author".to_owned(),
            price: "9.99".parse().unwrap(),
            genre: genre.to_owned(),
            summary: String::new(),
            cover_url: None,
            stock,
            seller_name: "Seller".to_owned(),
            seller_email: Email::parse("seller@example.com").unwrap(),
        }
        .into_book()
    }

    fn catalog() -> Vec<Book> {
        vec![
            book("The Hobbit", "Sci-Fi", 10),
            book("1984", "Sci-Fi", 7),
            book("Clean Code", "Non-Fiction", 3),
            book("Emma", "Fiction", 0),
        ]
    }

    #[test]
    fn test_recommend_returns_top_stock_in_order() {
        let reply = reply("Can you recommend something?", &catalog());
        assert_eq!(reply.source, ChatSource::System);
        let titles: Vec<&str> = reply.books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["The Hobbit", "1984", "Clean Code"]);
    }

    #[test]
    fn test_genre_match() {
        let reply = reply("got any sci-fi?", &catalog());
        assert_eq!(reply.books.len(), 2);
        assert!(reply.response.contains("Sci-Fi"));
    }

    #[test]
    fn test_how_many() {
        let reply = reply("how many books do you have?", &catalog());
        assert!(reply.response.contains('4'));
    }

    #[test]
    fn test_cart_wishlist_order_actions() {
        assert_eq!(reply("show my cart", &[]).actions, vec!["view_cart"]);
        assert_eq!(reply("open wishlist", &[]).actions, vec!["view_wishlist"]);
        assert_eq!(
            reply("where is my order?", &[]).actions,
            vec!["view_orders"]
        );
    }

    #[test]
    fn test_add_to_wishlist_matches_title() {
        let reply = reply("please add 1984 to my wishlist", &catalog());
        assert_eq!(reply.actions, vec!["add_to_wishlist"]);
        assert_eq!(reply.books.len(), 1);
        assert_eq!(reply.books[0].title, "1984");
    }

    #[test]
    fn test_search_finds_title() {
        let reply = reply("do you have 1984 in stock?", &catalog());
        assert_eq!(reply.books.len(), 1);
        assert_eq!(reply.books[0].title, "1984");
    }

    #[test]
    fn test_unknown_message_gets_help() {
        let reply = reply("xyzzy plugh", &catalog());
        assert!(reply.books.is_empty());
        assert!(reply.actions.is_empty());
        assert_eq!(reply.source, ChatSource::System);
    }

    #[test]
    fn test_greeting() {
        let reply = reply("hey there", &catalog());
        assert!(reply.response.starts_with("Hello"));
    }
}
