//! Core error types for the resolution pipeline.
//!
//! Two families live here:
//! - [`Error`]: setup failures (market file, configuration). These surface to
//!   the binary, which still answers with the unresolved recommendation.
//! - [`NormalizeError`]: why a payload could not be turned into an event.
//!   Never propagated; the normalizer boundary folds it into `UNKNOWN`.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for loading and validating markets.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read market file {path}: {message}")]
    MarketFileIo { path: String, message: String },

    #[error("Failed to parse market definition: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid market definition: {0}")]
    InvalidMarket(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Missing configuration key: {0}")]
    MissingConfigKey(String),
}

/// Why a vendor payload could not be normalized.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// Zero or several records match the lookup key.
    #[error("Ambiguous data: {0}")]
    Ambiguous(String),

    /// The vendor reports a final status but a required fact is absent.
    #[error("Missing comparable '{0}' on a final record")]
    MissingComparable(String),

    /// The payload does not have the configured shape.
    #[error("Malformed payload: {0}")]
    Malformed(String),

    /// The normalizer cannot work with this kind of lookup key.
    #[error("{normalizer} normalizer cannot use a {key} lookup key")]
    UnsupportedKey {
        normalizer: &'static str,
        key: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = Error::InvalidMarket("outcome map is not injective".to_string());
        assert_eq!(
            format!("{}", error),
            "Invalid market definition: outcome map is not injective"
        );

        let error = NormalizeError::UnsupportedKey {
            normalizer: "candles",
            key: "match",
        };
        assert_eq!(
            format!("{}", error),
            "candles normalizer cannot use a match lookup key"
        );
    }
}
