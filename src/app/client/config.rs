//! HTTP client configuration and building logic
//!
//! This module handles the configuration and construction of the single
//! `reqwest::Client` shared by catalog requests and download workers.

use std::time::Duration;

use reqwest::redirect::{Attempt, Policy};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{catalog, http, placeholders};

/// Static credentials attached to catalog requests
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    /// API key, sent as the basic auth user name
    pub api_key: String,
    /// API secret, sent as the basic auth password
    pub api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }
}

// Keep the secret out of debug logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .finish()
    }
}

/// Configuration for the catalog and download HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Catalog base URL; listing paths are appended to it verbatim
    pub base_url: String,
    /// Credentials for catalog requests
    pub credentials: Credentials,
    /// Whole-request timeout, covering download bodies; `None` leaves requests unbounded
    pub request_timeout: Option<Duration>,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Connection pool idle timeout
    pub pool_idle_timeout: Option<Duration>,
    /// TCP nodelay (disable Nagle's algorithm)
    pub tcp_nodelay: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: catalog::DEFAULT_EXTRACT_URL.to_string(),
            credentials: Credentials::new(placeholders::API_KEY, placeholders::API_SECRET),
            request_timeout: None,
            connect_timeout: http::CONNECT_TIMEOUT,
            pool_idle_timeout: Some(http::POOL_IDLE_TIMEOUT),
            tcp_nodelay: true,
        }
    }
}

impl ClientConfig {
    /// Create a configuration for a base URL and credentials, keeping default timeouts
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
            ..Default::default()
        }
    }

    /// Builds the HTTP client with the specified configuration
    pub fn build_http_client(&self) -> reqwest::Result<Client> {
        let mut client_builder = Client::builder()
            .connect_timeout(self.connect_timeout)
            .user_agent(http::USER_AGENT)
            .redirect(redirect_logging_policy())
            .tcp_nodelay(self.tcp_nodelay);

        if let Some(timeout) = self.request_timeout {
            client_builder = client_builder.timeout(timeout);
        }

        if let Some(idle_timeout) = self.pool_idle_timeout {
            client_builder = client_builder.pool_idle_timeout(idle_timeout);
        }

        client_builder.build()
    }
}

/// Follow redirects up to the configured limit, logging each hop
fn redirect_logging_policy() -> Policy {
    Policy::custom(|attempt: Attempt| {
        if attempt.previous().len() > http::MAX_REDIRECTS {
            return attempt.error("too many redirects");
        }
        if let Some(from) = attempt.previous().last() {
            debug!("redirecting from {} to {}", from, attempt.url());
        }
        attempt.follow()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, catalog::DEFAULT_EXTRACT_URL);
        assert!(config.tcp_nodelay);
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn test_http_client_with_custom_config() {
        let config = ClientConfig {
            request_timeout: Some(Duration::from_secs(30)),
            connect_timeout: Duration::from_secs(10),
            pool_idle_timeout: None,
            ..Default::default()
        };

        assert!(config.build_http_client().is_ok());
    }

    #[test]
    fn test_credentials_debug_hides_secret() {
        let credentials = Credentials::new("key", "very-secret");
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("key"));
        assert!(!debug.contains("very-secret"));
    }
}
