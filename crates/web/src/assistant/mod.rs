//! Shopping assistant.
//!
//! Tries a hosted chat model first and falls back to keyword rules when the
//! model is unconfigured, unreachable, or returns nothing. A model reply in
//! plain text instead of the requested JSON is still an answer and is passed
//! through as-is. The caller always gets a usable [`ChatReply`].

mod client;
mod error;
mod fallback;
mod types;

pub use client::AssistantClient;
pub use error::AssistantError;
pub use types::{BookCard, ChatReply, ChatSource};

use crate::models::Book;

/// Model-backed assistant with a rule-based safety net.
#[derive(Debug, Clone)]
pub struct Assistant {
    client: Option<AssistantClient>,
}

impl Assistant {
    #[must_use]
    pub const fn new(client: Option<AssistantClient>) -> Self {
        Self { client }
    }

    /// Answer a customer message given the current catalog.
    pub async fn respond(&self, message: &str, books: &[Book]) -> ChatReply {
        if let Some(client) = &self.client {
            match client.chat(message, books).await {
                Ok(reply) => return reply,
                Err(err) => {
                    tracing::warn!(error = %err, "assistant model unavailable, using fallback");
                }
            }
        }
        fallback::reply(message, books)
    }
}
