use std::fmt;

use serde::{Deserialize, Serialize};

use super::FetchError;

/// Why a fetch ultimately failed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureReason {
    /// Timeout, connection error, or an unexpected HTTP status.
    Network,
    /// Credentials missing or rejected.
    Auth,
    /// The lookup key could not be expressed against any endpoint.
    NotFound,
    /// HTTP 429 after the retry budget was spent.
    RateLimited,
    /// The endpoint answered 2xx with something that is not JSON.
    InvalidPayload,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network => write!(f, "NETWORK"),
            Self::Auth => write!(f, "AUTH"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::RateLimited => write!(f, "RATE_LIMITED"),
            Self::InvalidPayload => write!(f, "INVALID_PAYLOAD"),
        }
    }
}

/// Terminal outcome of a fetch in which no endpoint produced a record.
///
/// This is a value, not an error to be propagated: the normalizer turns it
/// into an `UNKNOWN` event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchFailure {
    pub reason: FailureReason,
    pub message: String,
    /// Attempts made across all endpoints before giving up.
    pub attempts: u32,
}

impl FetchFailure {
    pub fn new(reason: FailureReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
            attempts: 0,
        }
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.reason, self.message)
    }
}

impl From<FetchError> for FetchFailure {
    fn from(error: FetchError) -> Self {
        Self::new(error.failure_reason(), error.to_string())
    }
}
