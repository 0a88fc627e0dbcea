//! Adapter module.
//!
//! This module provides orchestration for record sources, including:
//! - Bounded retry with exponential backoff per endpoint
//! - Failover from the primary to the secondary endpoint
//! - Per-attempt diagnostics

mod data_source_adapter;
mod diagnostics;
mod retry_policy;

pub use data_source_adapter::DataSourceAdapter;
pub use diagnostics::{AttemptOutcome, FetchAttempt, FetchDiagnostics};
pub use retry_policy::RetryPolicy;
