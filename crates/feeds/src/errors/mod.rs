//! Error types and retry classification for the feeds crate.
//!
//! This module provides:
//! - [`FetchError`]: the error for a single attempt against a single endpoint
//! - [`RetryClass`]: classification for determining retry behavior
//! - [`FetchFailure`] and [`FailureReason`]: what the adapter surfaces once
//!   every attempt on every endpoint has failed

mod failure;
mod retry;

pub use failure::{FailureReason, FetchFailure};
pub use retry::RetryClass;

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during a single fetch attempt.
///
/// Each variant is classified into a [`RetryClass`] via the
/// [`retry_class`](Self::retry_class) method, which determines how the
/// adapter handles the error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The connection could not be established or was dropped mid-response.
    #[error("Network error: {endpoint} - {message}")]
    Network {
        /// The endpoint that failed
        endpoint: String,
        /// The transport error message
        message: String,
    },

    /// The request did not complete within the configured timeout.
    #[error("Timeout: {endpoint}")]
    Timeout {
        /// The endpoint that timed out
        endpoint: String,
    },

    /// The endpoint rate limited the request (HTTP 429).
    #[error("Rate limited: {endpoint}")]
    RateLimited {
        /// The endpoint that rate limited the request
        endpoint: String,
        /// Delay requested by the server through `Retry-After`, if any
        retry_after: Option<Duration>,
    },

    /// The endpoint rejected our credentials (HTTP 401/403).
    #[error("Authentication rejected: {endpoint} (HTTP {status})")]
    Auth {
        /// The endpoint that rejected the request
        endpoint: String,
        /// The HTTP status code
        status: u16,
    },

    /// Any other non-2xx status except 404.
    #[error("HTTP error: {endpoint} (HTTP {status})")]
    Http {
        /// The endpoint that returned the status
        endpoint: String,
        /// The HTTP status code
        status: u16,
    },

    /// A 2xx response whose body is not valid JSON.
    #[error("Invalid payload: {endpoint} - {message}")]
    InvalidPayload {
        /// The endpoint that returned the payload
        endpoint: String,
        /// The decoding error message
        message: String,
    },

    /// The endpoint URL template references a field the lookup key lacks.
    #[error("Lookup key has no '{placeholder}' for endpoint {endpoint}")]
    UnresolvedTemplate {
        /// The endpoint whose template could not be filled
        endpoint: String,
        /// The placeholder that had no value
        placeholder: String,
    },
}

impl FetchError {
    /// Returns the retry classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use settle_feeds::errors::{FetchError, RetryClass};
    ///
    /// let error = FetchError::RateLimited { endpoint: "primary".to_string(), retry_after: None };
    /// assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    ///
    /// let error = FetchError::Auth { endpoint: "primary".to_string(), status: 401 };
    /// assert_eq!(error.retry_class(), RetryClass::NextEndpoint);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::Network { .. }
            | Self::Timeout { .. }
            | Self::RateLimited { .. }
            | Self::Http { .. } => RetryClass::WithBackoff,

            Self::Auth { .. } | Self::InvalidPayload { .. } | Self::UnresolvedTemplate { .. } => {
                RetryClass::NextEndpoint
            }
        }
    }

    /// The reason reported to callers when this error is the last one seen.
    pub fn failure_reason(&self) -> FailureReason {
        match self {
            Self::Network { .. } | Self::Timeout { .. } | Self::Http { .. } => {
                FailureReason::Network
            }
            Self::RateLimited { .. } => FailureReason::RateLimited,
            Self::Auth { .. } => FailureReason::Auth,
            Self::InvalidPayload { .. } => FailureReason::InvalidPayload,
            Self::UnresolvedTemplate { .. } => FailureReason::NotFound,
        }
    }

    /// Server-requested delay before the next attempt.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}
