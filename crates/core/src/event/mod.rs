//! Canonical event model.
//!
//! - `status` - Lifecycle status shared by every vendor (EventStatus)
//! - `comparables` - Named numeric/boolean facts (Comparables, Fact)
//!
//! A [`NormalizedEvent`] with status `FINAL` can only be built through
//! [`NormalizedEvent::finalized`], which rejects missing comparables.

mod comparables;
mod status;

pub use comparables::{Comparables, Fact};
pub use status::EventStatus;

use chrono::{DateTime, Utc};

use crate::errors::NormalizeError;

/// Well-known comparable names produced by the built-in normalizers.
pub mod names {
    pub const SIDE_A: &str = "side_a";
    pub const SIDE_B: &str = "side_b";
    pub const MIN_LOW: &str = "min_low";
    pub const MAX_HIGH: &str = "max_high";
    pub const FIRST_OPEN: &str = "first_open";
    pub const LAST_CLOSE: &str = "last_close";
    pub const TERM_FOUND: &str = "term_found";
    pub const TERM_COUNT: &str = "term_count";
}

/// Vendor-independent snapshot of an event.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedEvent {
    status: EventStatus,
    comparables: Comparables,
    observed_at: DateTime<Utc>,
}

impl NormalizedEvent {
    /// Final event; fails if any `required` comparable is absent.
    pub fn finalized(
        comparables: Comparables,
        required: &[&str],
        observed_at: DateTime<Utc>,
    ) -> Result<Self, NormalizeError> {
        if let Some(missing) = comparables.first_missing(required) {
            return Err(NormalizeError::MissingComparable(missing.to_string()));
        }
        Ok(Self {
            status: EventStatus::Final,
            comparables,
            observed_at,
        })
    }

    /// Non-final event with whatever partial comparables are available.
    ///
    /// `EventStatus::Final` is downgraded to `Unknown`: a final event must
    /// go through [`finalized`](Self::finalized).
    pub fn pending(
        status: EventStatus,
        comparables: Comparables,
        observed_at: DateTime<Utc>,
    ) -> Self {
        let status = if status.is_final() {
            EventStatus::Unknown
        } else {
            status
        };
        Self {
            status,
            comparables,
            observed_at,
        }
    }

    pub fn unknown(observed_at: DateTime<Utc>) -> Self {
        Self::pending(EventStatus::Unknown, Comparables::new(), observed_at)
    }

    pub fn scheduled(observed_at: DateTime<Utc>) -> Self {
        Self::pending(EventStatus::Scheduled, Comparables::new(), observed_at)
    }

    pub fn status(&self) -> EventStatus {
        self.status
    }

    pub fn comparables(&self) -> &Comparables {
        &self.comparables
    }

    pub fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_finalized_requires_comparables() {
        let comparables = Comparables::new().with(names::SIDE_A, Fact::Number(dec!(5)));
        let err = NormalizedEvent::finalized(
            comparables.clone(),
            &[names::SIDE_A, names::SIDE_B],
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(err, NormalizeError::MissingComparable("side_b".to_string()));

        let event = NormalizedEvent::finalized(comparables, &[names::SIDE_A], Utc::now()).unwrap();
        assert_eq!(event.status(), EventStatus::Final);
    }

    #[test]
    fn test_pending_never_builds_final() {
        let event = NormalizedEvent::pending(EventStatus::Final, Comparables::new(), Utc::now());
        assert_eq!(event.status(), EventStatus::Unknown);

        let event = NormalizedEvent::pending(EventStatus::Live, Comparables::new(), Utc::now());
        assert_eq!(event.status(), EventStatus::Live);
    }
}
