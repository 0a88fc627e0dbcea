//! Generic HTTP JSON record source.
//!
//! Issues a single GET against a templated URL and classifies the response:
//!
//! | Response | Result |
//! |----------|--------|
//! | 2xx with JSON body | `Ok(RawBody::Json)` (`null`/`[]` become `NotFound`) |
//! | 2xx with empty body, or 404 | `Ok(RawBody::NotFound)` |
//! | 2xx with non-JSON body | `Err(InvalidPayload)` |
//! | 401 / 403 | `Err(Auth)` |
//! | 429 | `Err(RateLimited)` carrying `Retry-After` |
//! | any other status | `Err(Http)` |
//! | transport error / timeout | `Err(Network)` / `Err(Timeout)` |

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, RequestBuilder, StatusCode};

use crate::errors::FetchError;
use crate::models::{LookupKey, RawBody, RawRecord};

use super::endpoint::{EndpointAuth, EndpointConfig};
use super::traits::RecordSource;

/// Default HTTP request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Record source backed by one HTTP JSON endpoint.
pub struct HttpJsonSource {
    client: Client,
    endpoint: EndpointConfig,
}

impl HttpJsonSource {
    /// Create a source with the default timeout.
    pub fn new(endpoint: EndpointConfig) -> Self {
        Self::with_timeout(endpoint, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a source whose requests time out after `timeout`.
    pub fn with_timeout(endpoint: EndpointConfig, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.endpoint.auth {
            EndpointAuth::None => request,
            EndpointAuth::Header { name, key } => match key {
                Some(key) => request.header(name.as_str(), key.as_str()),
                None => request,
            },
            EndpointAuth::Bearer { key } => match key {
                Some(key) => request.bearer_auth(key),
                None => request,
            },
            EndpointAuth::Query { param, key } => match key {
                Some(key) => request.query(&[(param.as_str(), key.as_str())]),
                None => request,
            },
        }
    }

    fn transport_error(&self, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout {
                endpoint: self.endpoint.name.clone(),
            }
        } else {
            FetchError::Network {
                endpoint: self.endpoint.name.clone(),
                message: error.to_string(),
            }
        }
    }
}

#[async_trait]
impl RecordSource for HttpJsonSource {
    fn id(&self) -> &str {
        &self.endpoint.name
    }

    async fn fetch(&self, key: &LookupKey) -> Result<RawRecord, FetchError> {
        let url = self.endpoint.render_url(key)?;

        let mut request = self.client.get(&url);
        for (name, value) in &self.endpoint.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        let request = self.authorize(request);

        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_retry_after);

        let text = response.text().await.map_err(|e| self.transport_error(e))?;
        debug!(
            "Endpoint '{}' answered {} ({} bytes)",
            self.endpoint.name,
            status,
            text.len()
        );

        let body = classify_response(&self.endpoint.name, status, retry_after, &text)?;
        Ok(RawRecord::new(self.endpoint.name.clone(), Utc::now(), body))
    }
}

/// Map an HTTP status and body onto a record body or a fetch error.
pub fn classify_response(
    endpoint: &str,
    status: StatusCode,
    retry_after: Option<Duration>,
    body: &str,
) -> Result<RawBody, FetchError> {
    if status == StatusCode::NOT_FOUND {
        return Ok(RawBody::NotFound);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(FetchError::RateLimited {
            endpoint: endpoint.to_string(),
            retry_after,
        });
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(FetchError::Auth {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        });
    }

    if !status.is_success() {
        return Err(FetchError::Http {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        });
    }

    if body.trim().is_empty() {
        return Ok(RawBody::NotFound);
    }

    serde_json::from_str(body)
        .map(RawBody::from_json)
        .map_err(|e| FetchError::InvalidPayload {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
}

/// `Retry-After` in its delay-seconds form. HTTP-date values are ignored.
fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}
