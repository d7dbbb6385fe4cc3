use std::time::Duration;

use url::Url;

use crate::error::InferenceError;
use crate::retry::RetryPolicy;

pub const DEFAULT_USER_AGENT: &str = concat!("exewatch/", env!("CARGO_PKG_VERSION"));

/// Configurable options for the inference client.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Base URL of the remote service; endpoints are joined onto this.
    pub base_url: Url,

    /// Overall timeout for each HTTP request. Generous because payloads
    /// carry whole files and the upstream may be cold-starting.
    pub request_timeout: Duration,

    /// Connection timeout (time to establish the initial connection).
    pub connect_timeout: Duration,

    /// User agent string.
    pub user_agent: String,

    /// Retry behavior applied to both pipeline calls.
    pub retry: RetryPolicy,
}

impl InferenceConfig {
    /// Build a config for the given base URL with default timeouts and retry.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, InferenceError> {
        let input = base_url.as_ref();
        let base_url = Url::parse(input)
            .map_err(|e| InferenceError::invalid_base_url(input, e.to_string()))?;

        Ok(Self {
            base_url,
            request_timeout: Duration::from_secs(90),
            connect_timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Build the underlying reqwest client from this configuration.
    pub(crate) fn build_http_client(&self) -> Result<reqwest::Client, InferenceError> {
        let client = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(self.user_agent.clone())
            .build()?;
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_base_url() {
        let err = InferenceConfig::new("not a url").unwrap_err();
        assert!(matches!(err, InferenceError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn default_timeout_is_generous() {
        let config = InferenceConfig::new("http://127.0.0.1:8000").unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(90));
        assert_eq!(config.retry.max_retries, 3);
    }
}
