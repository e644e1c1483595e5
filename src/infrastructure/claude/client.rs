use super::errors::ClaudeApiError;
use super::rate_limiter::IntervalRateLimiter;
use super::types::{MessageRequest, MessageResponse};
use reqwest::{header, Client as ReqwestClient, Response};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::models::AnalystSettings;

/// Configuration for the Claude HTTP client
#[derive(Debug, Clone)]
pub struct ClaudeClientConfig {
    /// API key for authentication
    pub api_key: String,

    /// Base URL for Claude API
    pub base_url: String,

    /// Minimum spacing between two requests in milliseconds
    pub min_interval_ms: u64,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ClaudeClientConfig {
    /// Build from analyst settings, reading the key from `ANTHROPIC_API_KEY`
    pub fn from_env(settings: &AnalystSettings) -> Result<Self, ClaudeApiError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ClaudeApiError::MissingApiKey)?;

        Ok(Self {
            api_key,
            base_url: settings.base_url.clone(),
            min_interval_ms: settings.min_interval_ms,
            timeout_secs: settings.timeout_secs,
        })
    }
}

/// HTTP client for interacting with the Claude API
///
/// Provides:
/// - Connection pooling and reuse
/// - Minimum spacing between requests
/// - Structured error handling
///
/// Requests are not retried; a failed call is reported to the caller.
pub struct ClaudeClient {
    http_client: ReqwestClient,
    base_url: String,
    rate_limiter: IntervalRateLimiter,
}

impl ClaudeClient {
    /// Create a new Claude API client
    ///
    /// # Example
    /// ```no_run
    /// use balance_tuner::infrastructure::claude::client::{ClaudeClient, ClaudeClientConfig};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = ClaudeClientConfig {
    ///     api_key: "sk-ant-...".to_string(),
    ///     base_url: "https://api.anthropic.com".to_string(),
    ///     min_interval_ms: 1000,
    ///     timeout_secs: 120,
    /// };
    /// let client = ClaudeClient::new(config)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: ClaudeClientConfig) -> Result<Self, ClaudeApiError> {
        let api_key_scrubbed = scrub_api_key(&config.api_key);

        info!(
            base_url = %config.base_url,
            min_interval_ms = config.min_interval_ms,
            timeout_secs = config.timeout_secs,
            api_key = %api_key_scrubbed,
            "initializing Claude API client"
        );

        let mut headers = header::HeaderMap::new();
        headers.insert(
            "x-api-key",
            header::HeaderValue::from_str(&config.api_key)
                .map_err(|e| ClaudeApiError::InvalidRequest(format!("Invalid API key: {e}")))?,
        );
        headers.insert(
            "anthropic-version",
            header::HeaderValue::from_static("2023-06-01"),
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let http_client = ReqwestClient::builder()
            .pool_max_idle_per_host(2)
            .timeout(Duration::from_secs(config.timeout_secs))
            .tcp_nodelay(true)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            rate_limiter: IntervalRateLimiter::new(Duration::from_millis(config.min_interval_ms)),
        })
    }

    /// Send a message to Claude and get a response
    #[instrument(skip(self, request), fields(model = %request.model, max_tokens = request.max_tokens))]
    pub async fn send_message(
        &self,
        request: &MessageRequest,
    ) -> Result<MessageResponse, ClaudeApiError> {
        self.rate_limiter.acquire().await;

        let url = format!("{}/v1/messages", self.base_url);
        debug!("POST {}", url);

        let result = match self.http_client.post(&url).json(request).send().await {
            Ok(response) => self.handle_response(response).await,
            Err(err) => Err(ClaudeApiError::NetworkError(err)),
        };

        match &result {
            Ok(response) => {
                info!(
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    "message request succeeded"
                );
            }
            Err(err) => {
                error!(error = %err, "message request failed");
            }
        }

        result
    }

    /// Handle HTTP response and convert to typed result
    async fn handle_response(&self, response: Response) -> Result<MessageResponse, ClaudeApiError> {
        let status = response.status();
        debug!(%status, "response received");

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            warn!("API error ({}): {}", status, body);
            return Err(ClaudeApiError::from_status(status, body));
        }

        Ok(response.json().await?)
    }
}

/// First eight characters of the key, safe to log.
fn scrub_api_key(api_key: &str) -> String {
    if api_key.chars().count() > 8 {
        let prefix: String = api_key.chars().take(8).collect();
        format!("{prefix}...[REDACTED]")
    } else {
        "[REDACTED]".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: &str) -> ClaudeClientConfig {
        ClaudeClientConfig {
            api_key: api_key.to_string(),
            base_url: "https://api.test.com/".to_string(),
            min_interval_ms: 0,
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_client_creation() {
        let client = ClaudeClient::new(config("test-api-key")).unwrap();
        assert_eq!(client.base_url, "https://api.test.com");
    }

    #[test]
    fn test_api_key_with_newline_is_rejected() {
        let result = ClaudeClient::new(config("bad\nkey"));
        assert!(matches!(result, Err(ClaudeApiError::InvalidRequest(_))));
    }

    #[test]
    fn test_config_from_env_requires_key() {
        temp_env::with_var("ANTHROPIC_API_KEY", None::<&str>, || {
            let result = ClaudeClientConfig::from_env(&AnalystSettings::default());
            assert!(matches!(result, Err(ClaudeApiError::MissingApiKey)));
        });

        temp_env::with_var("ANTHROPIC_API_KEY", Some("sk-test"), || {
            let config = ClaudeClientConfig::from_env(&AnalystSettings::default()).unwrap();
            assert_eq!(config.api_key, "sk-test");
            assert_eq!(config.min_interval_ms, 1000);
        });
    }

    #[test]
    fn test_scrub_api_key() {
        assert_eq!(scrub_api_key("sk-ant-api03-secret"), "sk-ant-a...[REDACTED]");
        assert_eq!(scrub_api_key("short"), "[REDACTED]");
    }

    #[test]
    fn test_scrub_api_key_multibyte() {
        // byte 8 falls inside the 'é'
        assert_eq!(scrub_api_key("sk-ant-éé-secret"), "sk-ant-é...[REDACTED]");
    }

    #[test]
    fn test_multibyte_key_is_rejected_without_panicking() {
        let result = ClaudeClient::new(config("sk-ant-éé\nsecret"));
        assert!(matches!(result, Err(ClaudeApiError::InvalidRequest(_))));
    }
}
