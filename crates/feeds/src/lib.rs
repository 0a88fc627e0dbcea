//! Settle Feeds Crate
//!
//! Vendor-agnostic record fetching for outcome resolution.
//!
//! # Overview
//!
//! The feeds crate supports:
//! - Lookup keys for fixtures, price windows, vendor events and text searches
//! - Any HTTP JSON endpoint addressed through a URL template
//! - Bounded retry with exponential backoff and failover to a secondary endpoint
//! - Distinguishing "no record yet" (404/empty) from transport failure
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |    LookupKey     |  (immutable identity of the event)
//! +------------------+
//!          |
//!          v
//! +-------------------+
//! | DataSourceAdapter |  (retry, backoff, primary -> secondary)
//! +-------------------+
//!          |
//!          v
//! +------------------+
//! |  RecordSource    |  (HttpJsonSource, one request per call)
//! +------------------+
//!          |
//!          v
//! +---------------------------------+
//! | RawRecord  |  FetchFailure      |  (vendor-shaped JSON or a reason)
//! +---------------------------------+
//! ```

pub mod adapter;
pub mod errors;
pub mod models;
pub mod source;

pub use adapter::{AttemptOutcome, DataSourceAdapter, FetchAttempt, FetchDiagnostics, RetryPolicy};
pub use errors::{FailureReason, FetchError, FetchFailure, RetryClass};
pub use models::{LookupKey, RawBody, RawRecord};
pub use source::{EndpointAuth, EndpointConfig, HttpJsonSource, RecordSource};
