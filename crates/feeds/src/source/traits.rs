//! Record source trait definitions.

use async_trait::async_trait;

use crate::errors::FetchError;
use crate::models::{LookupKey, RawRecord};

/// A single endpoint able to fetch the raw record for a lookup key.
///
/// Implementations perform exactly one request per call; retrying and
/// failover are the adapter's job.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use settle_feeds::{FetchError, LookupKey, RawRecord, RecordSource};
///
/// struct FixtureSource;
///
/// #[async_trait]
/// impl RecordSource for FixtureSource {
///     fn id(&self) -> &str {
///         "fixture"
///     }
///
///     async fn fetch(&self, key: &LookupKey) -> Result<RawRecord, FetchError> {
///         Ok(RawRecord::not_found(self.id(), chrono::Utc::now()))
///     }
/// }
/// ```
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Identifier used in logs and diagnostics.
    fn id(&self) -> &str;

    /// Fetch the record for `key`.
    ///
    /// A missing record (404 or empty result) is `Ok` with a
    /// [`RawBody::NotFound`](crate::models::RawBody::NotFound) body, never an error.
    async fn fetch(&self, key: &LookupKey) -> Result<RawRecord, FetchError>;
}
