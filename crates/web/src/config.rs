//! Application configuration from environment variables.

use std::net::SocketAddr;

use secrecy::SecretString;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),

    #[error("Invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
}

/// Runtime configuration, loaded once at startup.
#[derive(Clone)]
pub struct AppConfig {
    /// Interface to bind, default `127.0.0.1`.
    pub host: String,
    /// Port to bind, default `5000`.
    pub port: u16,
    /// Public base URL, used to decide cookie security.
    pub base_url: String,
    /// Repopulate the store with demo data on boot.
    pub seed: bool,
    /// Chat model served through an OpenAI-compatible endpoint.
    pub inference_model: String,
    /// Endpoint base, default the Hugging Face router.
    pub inference_base_url: String,
    /// Bearer token for the inference endpoint. Absent means the assistant
    /// answers from its rule-based fallback only.
    pub inference_api_key: Option<SecretString>,
    /// Webhook receiving order and signup notifications. Absent disables
    /// outbound notifications.
    pub notify_webhook_url: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("base_url", &self.base_url)
            .field("seed", &self.seed)
            .field("inference_model", &self.inference_model)
            .field("inference_base_url", &self.inference_base_url)
            .field("inference_api_key", &self.inference_api_key.as_ref().map(|_| "[REDACTED]"))
            .field("notify_webhook_url", &self.notify_webhook_url)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = get_env_or_default("BOOKBAZAAR_HOST", "127.0.0.1");
        let port = parse_env_or_default("BOOKBAZAAR_PORT", 5000)?;
        let base_url = get_env_or_default("BOOKBAZAAR_BASE_URL", "http://127.0.0.1:5000");
        let seed = parse_env_or_default("BOOKBAZAAR_SEED", false)?;

        let inference_model = get_env_or_default("INFERENCE_MODEL", "Qwen/Qwen2.5-72B-Instruct");
        let inference_base_url =
            get_env_or_default("INFERENCE_BASE_URL", "https://router.huggingface.co/v1");
        let inference_api_key = get_optional_env("INFERENCE_API_KEY").map(SecretString::from);

        let notify_webhook_url = get_optional_env("NOTIFY_WEBHOOK_URL");

        Ok(Self {
            host,
            port,
            base_url,
            seed,
            inference_model,
            inference_base_url,
            inference_api_key,
            notify_webhook_url,
        })
    }

    /// Socket address to bind the HTTP listener to.
    ///
    /// # Errors
    ///
    /// Returns an error if host and port do not form a valid address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::InvalidValue {
                name: "BOOKBAZAAR_HOST/BOOKBAZAAR_PORT".to_owned(),
                message: format!("invalid socket address: {e}"),
            })
    }

    /// Session cookies are marked secure only behind HTTPS.
    #[must_use]
    pub fn use_secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

fn get_optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn get_env_or_default(name: &str, default: &str) -> String {
    get_optional_env(name).unwrap_or_else(|| default.to_owned())
}

fn parse_env_or_default<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get_optional_env(name) {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            name: name.to_owned(),
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig {
            host: "127.0.0.1".to_owned(),
            port: 5000,
            base_url: "http://127.0.0.1:5000".to_owned(),
            seed: false,
            inference_model: "Qwen/Qwen2.5-72B-Instruct".to_owned(),
            inference_base_url: "https://router.huggingface.co/v1".to_owned(),
            inference_api_key: None,
            notify_webhook_url: None,
        }
    }

    #[test]
    fn test_socket_addr() {
        let config = base_config();
        assert!(config.socket_addr().is_ok());
    }

    #[test]
    fn test_secure_cookies_follow_base_url_scheme() {
        let mut config = base_config();
        assert!(!config.use_secure_cookies());
        config.base_url = "https://books.example.com".to_owned();
        assert!(config.use_secure_cookies());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let mut config = base_config();
        config.inference_api_key = Some(SecretString::from("hf_secret_token".to_owned()));
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hf_secret_token"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
