use std::env;
use std::time::Duration;

use crate::error::{ApiError, Result};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Connection settings for one remote API.
///
/// Fields stay optional while the config is being assembled; they are checked
/// once when a client is built from it, and never change afterwards.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `<PREFIX>_API_KEY`, `<PREFIX>_API_URL` and `<PREFIX>_TIMEOUT_MS`.
    pub fn from_env(prefix: &str) -> Self {
        let api_key = env::var(format!("{}_API_KEY", prefix)).ok();
        let base_url = env::var(format!("{}_API_URL", prefix)).ok();
        let timeout = env::var(format!("{}_TIMEOUT_MS", prefix))
            .ok()
            .and_then(|ms| ms.parse().ok())
            .map(Duration::from_millis);

        ClientConfig {
            api_key,
            base_url,
            timeout,
        }
    }

    pub fn with_credentials(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_timeout_ms(self, millis: u64) -> Self {
        self.with_timeout(Duration::from_millis(millis))
    }

    pub fn timeout_or_default(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }

    pub(crate) fn resolve(self) -> Result<ResolvedConfig> {
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ApiError::Config("API key is required".into()))?;

        let base_url = self
            .base_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ApiError::Config("base URL is required".into()))?;

        reqwest::Url::parse(&base_url)
            .map_err(|e| ApiError::Config(format!("invalid base URL '{}': {}", base_url, e)))?;

        Ok(ResolvedConfig {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
        })
    }
}

/// Validated settings held by a transport for its whole lifetime.
#[derive(Clone)]
pub(crate) struct ResolvedConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_defaults_to_thirty_seconds() {
        let resolved = ClientConfig::new()
            .with_credentials("key")
            .with_base_url("https://api.example.com")
            .resolve()
            .unwrap();

        assert_eq!(resolved.timeout, Duration::from_millis(30_000));
        assert_eq!(ClientConfig::new().timeout_or_default(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn resolve_strips_trailing_slash() {
        let resolved = ClientConfig::new()
            .with_credentials("key")
            .with_base_url("https://api.example.com/v1/")
            .with_timeout_ms(50)
            .resolve()
            .unwrap();

        assert_eq!(resolved.base_url, "https://api.example.com/v1");
        assert_eq!(resolved.timeout, Duration::from_millis(50));
    }

    #[test]
    fn resolve_rejects_missing_or_bad_fields() {
        let missing_key = ClientConfig::new().with_base_url("https://api.example.com");
        assert_eq!(missing_key.resolve().unwrap_err().code(), "config_error");

        let blank_key = ClientConfig::new()
            .with_credentials("  ")
            .with_base_url("https://api.example.com");
        assert!(blank_key.resolve().is_err());

        let missing_url = ClientConfig::new().with_credentials("key");
        assert!(missing_url.resolve().is_err());

        let bad_url = ClientConfig::new()
            .with_credentials("key")
            .with_base_url("not a url");
        assert!(matches!(bad_url.resolve(), Err(ApiError::Config(_))));
    }

    #[test]
    fn debug_output_hides_api_key() {
        let resolved = ClientConfig::new()
            .with_credentials("super-secret")
            .with_base_url("https://api.example.com")
            .resolve()
            .unwrap();

        assert!(!format!("{:?}", resolved).contains("super-secret"));
    }

    #[test]
    fn from_env_reads_prefixed_variables() {
        env::set_var("RGENSTUDIO_TEST_API_KEY", "env-key");
        env::set_var("RGENSTUDIO_TEST_API_URL", "https://env.example.com");
        env::set_var("RGENSTUDIO_TEST_TIMEOUT_MS", "1500");

        let config = ClientConfig::from_env("RGENSTUDIO_TEST");
        assert_eq!(config.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.base_url.as_deref(), Some("https://env.example.com"));
        assert_eq!(config.timeout, Some(Duration::from_millis(1500)));

        env::set_var("RGENSTUDIO_TEST_TIMEOUT_MS", "soon");
        assert_eq!(ClientConfig::from_env("RGENSTUDIO_TEST").timeout, None);
    }
}
