//! Assistant errors.

/// Errors from the hosted chat model. All of them trigger the rule-based
/// fallback, so none reach HTTP responses directly.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Inference endpoint returned {status}: {body}")]
    Endpoint {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Model reply had no choices")]
    EmptyReply,
}
