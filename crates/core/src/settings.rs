//! Runtime fetch settings layered over a market file's endpoints.

use std::time::Duration;

use settle_feeds::source::DEFAULT_REQUEST_TIMEOUT;
use settle_feeds::{EndpointConfig, RetryPolicy};

/// Settings that come from the environment rather than the market file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchSettings {
    /// Per-request timeout.
    pub timeout: Duration,
    pub retry: RetryPolicy,
    /// Replaces the primary endpoint's URL template.
    pub primary_url: Option<String>,
    /// Replaces (or adds) the secondary endpoint's URL template.
    pub secondary_url: Option<String>,
    pub api_key: Option<String>,
    pub secondary_api_key: Option<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_REQUEST_TIMEOUT,
            retry: RetryPolicy::default(),
            primary_url: None,
            secondary_url: None,
            api_key: None,
            secondary_api_key: None,
        }
    }
}

impl FetchSettings {
    /// The primary endpoint with overrides applied.
    pub fn primary_endpoint(&self, configured: &EndpointConfig) -> EndpointConfig {
        overlay(
            configured.clone(),
            self.primary_url.as_deref(),
            self.api_key.as_deref(),
        )
    }

    /// The secondary endpoint with overrides applied. A secondary URL from
    /// the environment adds an endpoint even when the market file has none.
    pub fn secondary_endpoint(&self, configured: Option<&EndpointConfig>) -> Option<EndpointConfig> {
        let base = match (configured, self.secondary_url.as_deref()) {
            (Some(endpoint), _) => endpoint.clone(),
            (None, Some(url)) => EndpointConfig::new("secondary", url),
            (None, None) => return None,
        };
        Some(overlay(
            base,
            self.secondary_url.as_deref(),
            self.secondary_api_key.as_deref(),
        ))
    }
}

fn overlay(mut endpoint: EndpointConfig, url: Option<&str>, api_key: Option<&str>) -> EndpointConfig {
    if let Some(url) = url {
        endpoint.url = url.to_string();
    }
    if let Some(key) = api_key.filter(|k| !k.is_empty()) {
        endpoint.auth = endpoint.auth.with_key(key);
    }
    endpoint
}
