use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use settle_core::{Error, FetchSettings};
use settle_feeds::RetryPolicy;

const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BACKOFF_MS: u64 = 500;
const DEFAULT_BACKOFF_MAX_MS: u64 = 8_000;

pub struct Config {
    pub market_file: PathBuf,
    pub fetch: FetchSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build from any variable lookup. Empty values count as unset.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let market_file = var("SETTLE_MARKET_FILE")
            .map(PathBuf::from)
            .ok_or_else(|| Error::MissingConfigKey("SETTLE_MARKET_FILE".to_string()))?;

        let timeout_ms: u64 = parse(&var, "SETTLE_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?;
        let max_attempts: u32 = parse(&var, "SETTLE_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?;
        let backoff_ms: u64 = parse(&var, "SETTLE_BACKOFF_MS", DEFAULT_BACKOFF_MS)?;
        let backoff_max_ms: u64 = parse(&var, "SETTLE_BACKOFF_MAX_MS", DEFAULT_BACKOFF_MAX_MS)?;

        if timeout_ms == 0 {
            return Err(Error::InvalidConfigValue(
                "SETTLE_TIMEOUT_MS must be greater than zero".to_string(),
            ));
        }
        if max_attempts == 0 {
            return Err(Error::InvalidConfigValue(
                "SETTLE_MAX_ATTEMPTS must be at least 1".to_string(),
            ));
        }

        let fetch = FetchSettings {
            timeout: Duration::from_millis(timeout_ms),
            retry: RetryPolicy {
                max_attempts,
                base_delay: Duration::from_millis(backoff_ms),
                max_delay: Duration::from_millis(backoff_max_ms.max(backoff_ms)),
                ..RetryPolicy::default()
            },
            primary_url: var("SETTLE_PRIMARY_URL"),
            secondary_url: var("SETTLE_SECONDARY_URL"),
            api_key: var("SETTLE_API_KEY"),
            secondary_api_key: var("SETTLE_SECONDARY_API_KEY"),
        };

        Ok(Self { market_file, fetch })
    }
}

fn parse<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, Error> {
    match var(name) {
        Some(raw) => raw
            .parse()
            .map_err(|_| Error::InvalidConfigValue(format!("{name}={raw} is not a valid number"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(vars(&[("SETTLE_MARKET_FILE", "markets/nba.json")])).unwrap();
        assert_eq!(config.market_file, PathBuf::from("markets/nba.json"));
        assert_eq!(config.fetch.timeout, Duration::from_secs(10));
        assert_eq!(config.fetch.retry, RetryPolicy::default());
        assert!(config.fetch.primary_url.is_none());
        assert!(config.fetch.api_key.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_vars(vars(&[
            ("SETTLE_MARKET_FILE", "m.json"),
            ("SETTLE_TIMEOUT_MS", "2500"),
            ("SETTLE_MAX_ATTEMPTS", "5"),
            ("SETTLE_BACKOFF_MS", "100"),
            ("SETTLE_BACKOFF_MAX_MS", "1000"),
            ("SETTLE_SECONDARY_URL", "https://proxy.test/{date}"),
            ("SETTLE_API_KEY", "secret"),
        ]))
        .unwrap();
        assert_eq!(config.fetch.timeout, Duration::from_millis(2500));
        assert_eq!(config.fetch.retry.max_attempts, 5);
        assert_eq!(config.fetch.retry.base_delay, Duration::from_millis(100));
        assert_eq!(config.fetch.retry.max_delay, Duration::from_secs(1));
        assert_eq!(
            config.fetch.secondary_url.as_deref(),
            Some("https://proxy.test/{date}")
        );
        assert_eq!(config.fetch.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_missing_market_file() {
        let err = Config::from_vars(vars(&[("SETTLE_MARKET_FILE", "  ")])).err().unwrap();
        assert!(matches!(err, Error::MissingConfigKey(_)));
    }

    #[test]
    fn test_invalid_number() {
        let err = Config::from_vars(vars(&[
            ("SETTLE_MARKET_FILE", "m.json"),
            ("SETTLE_MAX_ATTEMPTS", "three"),
        ]))
        .err()
        .unwrap();
        assert_eq!(
            err.to_string(),
            "Invalid configuration value: SETTLE_MAX_ATTEMPTS=three is not a valid number"
        );
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let result = Config::from_vars(vars(&[
            ("SETTLE_MARKET_FILE", "m.json"),
            ("SETTLE_MAX_ATTEMPTS", "0"),
        ]));
        assert!(result.is_err());
    }
}
