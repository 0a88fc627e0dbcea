//! Attempt tracking for fetch diagnostics.

use crate::errors::{FetchError, RetryClass};

/// What a single attempt produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// A JSON record was returned.
    Record,
    /// The endpoint answered "no record yet".
    NoRecord,
    /// The attempt failed.
    Error { message: String, class: RetryClass },
}

/// Record of a single attempt against a single endpoint.
#[derive(Clone, Debug)]
pub struct FetchAttempt {
    pub source: String,
    /// 1-based attempt number on this endpoint.
    pub attempt: u32,
    pub outcome: AttemptOutcome,
}

/// Ordered trail of every attempt made during one fetch.
#[derive(Clone, Debug, Default)]
pub struct FetchDiagnostics {
    pub attempts: Vec<FetchAttempt>,
}

impl FetchDiagnostics {
    pub fn new() -> Self {
        Self {
            attempts: Vec::new(),
        }
    }

    pub fn record_success(&mut self, source: &str, attempt: u32, not_found: bool) {
        self.attempts.push(FetchAttempt {
            source: source.to_string(),
            attempt,
            outcome: if not_found {
                AttemptOutcome::NoRecord
            } else {
                AttemptOutcome::Record
            },
        });
    }

    pub fn record_error(&mut self, source: &str, attempt: u32, error: &FetchError) {
        self.attempts.push(FetchAttempt {
            source: source.to_string(),
            attempt,
            outcome: AttemptOutcome::Error {
                message: error.to_string(),
                class: error.retry_class(),
            },
        });
    }

    /// Summary for logging/debugging.
    pub fn summary(&self) -> String {
        self.attempts
            .iter()
            .map(|a| match &a.outcome {
                AttemptOutcome::Record => format!("{}#{}: RECORD", a.source, a.attempt),
                AttemptOutcome::NoRecord => format!("{}#{}: NO_RECORD", a.source, a.attempt),
                AttemptOutcome::Error { message, .. } => {
                    format!("{}#{}: ERROR ({})", a.source, a.attempt, message)
                }
            })
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    /// Check if any attempt got an answer from its endpoint.
    pub fn has_success(&self) -> bool {
        self.attempts
            .iter()
            .any(|a| !matches!(a.outcome, AttemptOutcome::Error { .. }))
    }

    /// Number of attempts made against `source`.
    pub fn attempts_for(&self, source: &str) -> usize {
        self.attempts.iter().filter(|a| a.source == source).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_summary() {
        let mut diag = FetchDiagnostics::new();
        diag.record_error(
            "primary",
            1,
            &FetchError::Timeout {
                endpoint: "primary".to_string(),
            },
        );
        diag.record_success("proxy", 1, false);

        let summary = diag.summary();
        assert_eq!(summary, "primary#1: ERROR (Timeout: primary) -> proxy#1: RECORD");
    }

    #[test]
    fn test_has_success() {
        let mut diag = FetchDiagnostics::new();
        diag.record_error(
            "primary",
            1,
            &FetchError::Http {
                endpoint: "primary".to_string(),
                status: 500,
            },
        );
        assert!(!diag.has_success());

        diag.record_success("primary", 2, true);
        assert!(diag.has_success());
    }

    #[test]
    fn test_counts_and_errors() {
        let mut diag = FetchDiagnostics::new();
        let limited = FetchError::RateLimited {
            endpoint: "primary".to_string(),
            retry_after: None,
        };
        diag.record_error("primary", 1, &limited);
        diag.record_error("primary", 2, &limited);
        diag.record_success("proxy", 1, false);

        assert_eq!(diag.attempts_for("primary"), 2);
        assert_eq!(diag.attempts_for("proxy"), 1);
        assert!(matches!(
            diag.attempts[0].outcome,
            AttemptOutcome::Error {
                class: RetryClass::WithBackoff,
                ..
            }
        ));
    }
}
