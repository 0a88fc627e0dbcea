//! Vendor status vocabulary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::event::EventStatus;

const FINAL: &[&str] = &[
    "final",
    "ft",
    "aet",
    "pen",
    "finished",
    "complete",
    "completed",
    "closed",
    "ended",
    "full time",
    "fulltime",
    "match finished",
    "post",
    "status_final",
    "status_full_time",
];

const LIVE: &[&str] = &[
    "live",
    "in",
    "in_progress",
    "inprogress",
    "in progress",
    "1h",
    "2h",
    "ht",
    "halftime",
    "et",
    "bt",
    "running",
    "ongoing",
    "started",
    "status_in_progress",
    "status_halftime",
];

const SCHEDULED: &[&str] = &[
    "scheduled",
    "ns",
    "not_started",
    "not started",
    "tbd",
    "pre",
    "upcoming",
    "pending",
    "status_scheduled",
];

const POSTPONED: &[&str] = &[
    "postponed",
    "pst",
    "delayed",
    "suspended",
    "susp",
    "int",
    "interrupted",
    "rescheduled",
    "status_postponed",
    "status_delayed",
    "status_suspended",
];

const CANCELED: &[&str] = &[
    "canceled",
    "cancelled",
    "canc",
    "abd",
    "abandoned",
    "status_canceled",
    "status_cancelled",
];

/// Maps raw vendor status strings onto [`EventStatus`].
///
/// Overrides are checked first (case-insensitive), then a built-in vocabulary
/// covering the common sports, esports and exchange feeds. Anything else is
/// `UNKNOWN`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusMap {
    overrides: BTreeMap<String, EventStatus>,
}

impl StatusMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_override(mut self, raw: impl Into<String>, status: EventStatus) -> Self {
        self.overrides.insert(raw.into(), status);
        self
    }

    pub fn map(&self, raw: &str) -> EventStatus {
        let raw = raw.trim();

        if let Some(status) = self
            .overrides
            .iter()
            .find(|(k, _)| k.trim().eq_ignore_ascii_case(raw))
            .map(|(_, s)| *s)
        {
            return status;
        }

        let lowered = raw.to_ascii_lowercase();
        let table: [(&[&str], EventStatus); 5] = [
            (FINAL, EventStatus::Final),
            (LIVE, EventStatus::Live),
            (SCHEDULED, EventStatus::Scheduled),
            (POSTPONED, EventStatus::Postponed),
            (CANCELED, EventStatus::Canceled),
        ];
        table
            .iter()
            .find(|(words, _)| words.contains(&lowered.as_str()))
            .map(|(_, status)| *status)
            .unwrap_or(EventStatus::Unknown)
    }
}
