//! Hosted chat model client.
//!
//! Talks to an OpenAI-compatible chat completions endpoint. The system
//! prompt carries a JSON snapshot of the catalog and pins the reply to a
//! strict JSON shape so recommendations can be matched back to real
//! listings.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;

use crate::models::Book;

use super::error::AssistantError;
use super::types::{
    BookCard, ChatReply, ChatSource, CompletionRequest, CompletionResponse, ModelReply,
    WireMessage,
};

const MAX_TOKENS: u32 = 512;
const TEMPERATURE: f32 = 0.4;
/// Catalog rows embedded in the system prompt. Enough for a demo-sized
/// store without blowing the context window.
const PROMPT_CATALOG_LIMIT: usize = 50;

#[derive(Debug)]
struct AssistantClientInner {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: SecretString,
}

/// Client for the inference endpoint. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AssistantClient {
    inner: Arc<AssistantClientInner>,
}

impl AssistantClient {
    #[must_use]
    pub fn new(base_url: String, model: String, api_key: SecretString) -> Self {
        Self {
            inner: Arc::new(AssistantClientInner {
                client: reqwest::Client::new(),
                base_url,
                model,
                api_key,
            }),
        }
    }

    /// Ask the model to answer `message` against the current catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is unreachable, rejects the call,
    /// or replies with no choices.
    pub async fn chat(&self, message: &str, books: &[Book]) -> Result<ChatReply, AssistantError> {
        let url = format!(
            "{}/chat/completions",
            self.inner.base_url.trim_end_matches('/')
        );
        let request = CompletionRequest {
            model: &self.inner.model,
            messages: vec![
                WireMessage {
                    role: "system".to_owned(),
                    content: system_prompt(books),
                },
                WireMessage {
                    role: "user".to_owned(),
                    content: message.to_owned(),
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .inner
            .client
            .post(&url)
            .bearer_auth(self.inner.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Endpoint { status, body });
        }

        let completion: CompletionResponse = response.json().await?;
        let content = completion
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or(AssistantError::EmptyReply)?;

        Ok(reply_from_model(content, message, books))
    }
}

/// Turn the model's raw text into a [`ChatReply`].
///
/// When the text is the requested JSON shape, the recommended titles are
/// matched back to catalog entries. When it is not, the text is still a
/// real answer, so it is returned verbatim and any catalog titles the user
/// mentioned become the recommendations.
fn reply_from_model(content: &str, user_message: &str, books: &[Book]) -> ChatReply {
    match serde_json::from_str::<ModelReply>(extract_json(content)) {
        Ok(model_reply) => {
            let reply = ChatReply {
                response: model_reply.message,
                books: Vec::new(),
                actions: model_reply.action.into_iter().collect(),
                source: ChatSource::Ai,
            };
            reply.with_books(match_titles(&model_reply.recommended_books, books))
        }
        Err(err) => {
            tracing::debug!(error = %err, "model replied in plain text, keeping it verbatim");
            let reply = ChatReply {
                response: content.trim().to_owned(),
                books: Vec::new(),
                actions: Vec::new(),
                source: ChatSource::Ai,
            };
            reply.with_books(titles_in_text(user_message, books))
        }
    }
}

fn system_prompt(books: &[Book]) -> String {
    let catalog: Vec<serde_json::Value> = books
        .iter()
        .take(PROMPT_CATALOG_LIMIT)
        .map(|b| {
            json!({
                "title": b.title,
                "author": b.author,
                "genre": b.genre,
                "price": b.price.to_string(),
                "stock": b.stock,
            })
        })
        .collect();

    format!(
        "You are the shopping assistant for BookBazaar, an online bookstore. \
         Answer briefly and only about the store and its catalog. \
         The catalog is this JSON array: {catalog}. \
         Reply with a single JSON object and nothing else, shaped as \
         {{\"message\": string, \"recommended_books\": [book titles from the catalog], \
         \"action\": one of \"view_cart\", \"view_wishlist\", \"view_orders\" or null}}.",
        catalog = serde_json::Value::Array(catalog)
    )
}

/// Models sometimes wrap the JSON in a code fence or prose. Take the
/// outermost braces if present.
fn extract_json(content: &str) -> &str {
    let trimmed = content.trim();
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}

/// Catalog entries whose title appears anywhere in `text`, case-insensitively.
fn titles_in_text(text: &str, books: &[Book]) -> Vec<BookCard> {
    let text = text.to_lowercase();
    books
        .iter()
        .filter(|b| text.contains(&b.title.to_lowercase()))
        .take(ChatReply::MAX_BOOKS)
        .map(BookCard::from)
        .collect()
}

/// Map recommended titles back onto catalog entries, case-insensitively.
fn match_titles(titles: &[String], books: &[Book]) -> Vec<BookCard> {
    let mut cards = Vec::new();
    for title in titles {
        let wanted = title.to_lowercase();
        if let Some(book) = books.iter().find(|b| b.title.to_lowercase() == wanted) {
            cards.push(BookCard::from(book));
        }
        if cards.len() == ChatReply::MAX_BOOKS {
            break;
        }
    }
    cards
}
