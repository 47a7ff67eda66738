//! Assistant request and reply shapes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Book;

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatSource {
    /// The hosted chat model.
    Ai,
    /// The rule-based fallback.
    System,
}

/// A book surfaced in a chat reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookCard {
    pub id: String,
    pub title: String,
    pub author: String,
    pub price: Decimal,
    pub genre: String,
    pub cover_url: String,
}

impl From<&Book> for BookCard {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.to_string(),
            title: book.title.clone(),
            author: book.author.clone(),
            price: book.price,
            genre: book.genre.clone(),
            cover_url: book.cover_url.clone(),
        }
    }
}

/// Reply sent back to the chat widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    /// At most three suggested books.
    pub books: Vec<BookCard>,
    /// UI hints such as `view_cart` or `view_wishlist`.
    pub actions: Vec<String>,
    pub source: ChatSource,
}

impl ChatReply {
    /// Cap the number of suggested books a reply may carry.
    pub const MAX_BOOKS: usize = 3;

    #[must_use]
    pub fn system(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            books: Vec::new(),
            actions: Vec::new(),
            source: ChatSource::System,
        }
    }

    #[must_use]
    pub fn with_books(mut self, books: Vec<BookCard>) -> Self {
        self.books = books;
        self.books.truncate(Self::MAX_BOOKS);
        self
    }

    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.actions.push(action.into());
        self
    }
}

/// What the system prompt asks the model to emit.
#[derive(Debug, Deserialize)]
pub(super) struct ModelReply {
    pub message: String,
    #[serde(default)]
    pub recommended_books: Vec<String>,
    #[serde(default)]
    pub action: Option<String>,
}

// OpenAI-compatible chat completion wire types.

#[derive(Debug, Serialize)]
pub(super) struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<WireMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct WireMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct CompletionResponse {
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CompletionChoice {
    pub message: WireMessage,
}
