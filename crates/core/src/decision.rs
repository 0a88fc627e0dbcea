//! The decision step: `(NormalizedEvent, MarketSpec, now) -> OutcomeCode`.
//!
//! | Status | Before deadline | At/after deadline |
//! |--------|-----------------|-------------------|
//! | `FINAL` | rule outcome | rule outcome |
//! | `CANCELED` | `TIE_OR_VOID` | `TIE_OR_VOID` |
//! | `POSTPONED`, `SCHEDULED`, `LIVE`, `UNKNOWN` | `UNRESOLVED` | `TIE_OR_VOID` |
//!
//! A final event whose comparables do not satisfy the rule takes the
//! non-final row.

use chrono::{DateTime, Utc};
use log::{debug, warn};

use crate::event::{EventStatus, NormalizedEvent};
use crate::market::{MarketSpec, OutcomeCode};

/// Pure and total: every input yields exactly one code.
pub fn decide(event: &NormalizedEvent, spec: &MarketSpec, now: DateTime<Utc>) -> OutcomeCode {
    match event.status() {
        EventStatus::Final => match spec.rule.apply(event.comparables()) {
            Some(code) => code,
            None => {
                warn!(
                    "Market {}: final event lacks what the rule needs ({:?})",
                    spec.id,
                    spec.rule.required_comparables()
                );
                pending_outcome(spec, now)
            }
        },
        EventStatus::Canceled => OutcomeCode::TieOrVoid,
        EventStatus::Postponed
        | EventStatus::Scheduled
        | EventStatus::Live
        | EventStatus::Unknown => pending_outcome(spec, now),
    }
}

fn pending_outcome(spec: &MarketSpec, now: DateTime<Utc>) -> OutcomeCode {
    if now < spec.deadline {
        OutcomeCode::Unresolved
    } else {
        debug!(
            "Market {}: deadline {} passed without a final result",
            spec.id, spec.deadline
        );
        OutcomeCode::TieOrVoid
    }
}
