//! Data source adapter: primary endpoint, optional secondary, bounded retries.
//!
//! The adapter handles:
//! - Retrying transient failures with exponential backoff
//! - Falling back to the secondary/proxy endpoint once the primary is exhausted
//! - Folding the last error into a [`FetchFailure`] value
//! - Diagnostic tracking for every attempt

use std::sync::Arc;

use log::{debug, info, warn};

use super::{FetchDiagnostics, RetryPolicy};
use crate::errors::{FailureReason, FetchError, FetchFailure, RetryClass};
use crate::models::{LookupKey, RawRecord};
use crate::source::RecordSource;

/// Uniform "fetch the raw record for this key" capability.
///
/// No state is kept between calls: no caching, no circuit breaking.
pub struct DataSourceAdapter {
    primary: Arc<dyn RecordSource>,
    secondary: Option<Arc<dyn RecordSource>>,
    policy: RetryPolicy,
}

impl DataSourceAdapter {
    /// Create an adapter over a single endpoint with the default retry policy.
    pub fn new(primary: Arc<dyn RecordSource>) -> Self {
        Self {
            primary,
            secondary: None,
            policy: RetryPolicy::default(),
        }
    }

    /// Add a secondary endpoint tried after the primary is exhausted.
    pub fn with_secondary(mut self, secondary: Arc<dyn RecordSource>) -> Self {
        self.secondary = Some(secondary);
        self
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fetch the raw record for `key`.
    pub async fn fetch(&self, key: &LookupKey) -> Result<RawRecord, FetchFailure> {
        self.fetch_with_diagnostics(key).await.0
    }

    /// Fetch the raw record for `key`, returning the attempt trail as well.
    ///
    /// Tries endpoints in order:
    /// 1. Primary, retrying `WithBackoff` errors up to the policy's budget
    /// 2. Secondary (if configured), with the same budget
    /// 3. Otherwise fold the last error into a `FetchFailure`
    pub async fn fetch_with_diagnostics(
        &self,
        key: &LookupKey,
    ) -> (Result<RawRecord, FetchFailure>, FetchDiagnostics) {
        let mut diagnostics = FetchDiagnostics::new();
        let mut last_error: Option<FetchError> = None;

        for source in self.sources() {
            match self.fetch_from(source, key, &mut diagnostics).await {
                Ok(record) => {
                    debug!("Fetch for {} key: {}", key.kind(), diagnostics.summary());
                    return (Ok(record), diagnostics);
                }
                Err(e) => {
                    warn!("Endpoint '{}' exhausted: {}", source.id(), e);
                    last_error = Some(e);
                }
            }
        }

        info!("All endpoints failed: {}", diagnostics.summary());
        let failure = last_error
            .map(FetchFailure::from)
            .unwrap_or_else(|| FetchFailure::new(FailureReason::Network, "no endpoint attempted"))
            .with_attempts(diagnostics.attempts.len() as u32);
        (Err(failure), diagnostics)
    }

    fn sources(&self) -> impl Iterator<Item = &dyn RecordSource> {
        std::iter::once(self.primary.as_ref()).chain(self.secondary.as_deref())
    }

    async fn fetch_from(
        &self,
        source: &dyn RecordSource,
        key: &LookupKey,
        diagnostics: &mut FetchDiagnostics,
    ) -> Result<RawRecord, FetchError> {
        let max_attempts = self.policy.attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;

            let error = match source.fetch(key).await {
                Ok(record) => {
                    diagnostics.record_success(source.id(), attempt, record.is_not_found());
                    return Ok(record);
                }
                Err(e) => e,
            };
            diagnostics.record_error(source.id(), attempt, &error);

            match error.retry_class() {
                RetryClass::NextEndpoint => {
                    debug!(
                        "Endpoint '{}' failed with {:?}, not retrying",
                        source.id(),
                        error
                    );
                    return Err(error);
                }
                RetryClass::WithBackoff if attempt >= max_attempts => {
                    return Err(error);
                }
                RetryClass::WithBackoff => {
                    let delay = self.policy.delay_for(attempt, error.retry_after());
                    debug!(
                        "Endpoint '{}' attempt {}/{} failed ({}), retrying in {:?}",
                        source.id(),
                        attempt,
                        max_attempts,
                        error,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
