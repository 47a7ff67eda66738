//! Shared application state.

use std::sync::Arc;

use crate::assistant::{Assistant, AssistantClient};
use crate::config::AppConfig;
use crate::services::notify::Notifier;
use crate::store::Store;

#[derive(Debug)]
struct AppStateInner {
    config: AppConfig,
    store: Store,
    notifier: Notifier,
    assistant: Assistant,
}

/// Handle shared by every request. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let notifier = Notifier::new(config.notify_webhook_url.clone());
        let assistant_client = config.inference_api_key.clone().map(|api_key| {
            AssistantClient::new(
                config.inference_base_url.clone(),
                config.inference_model.clone(),
                api_key,
            )
        });
        let assistant = Assistant::new(assistant_client);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store: Store::new(),
                notifier,
                assistant,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    #[must_use]
    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    #[must_use]
    pub fn assistant(&self) -> &Assistant {
        &self.inner.assistant
    }
}
