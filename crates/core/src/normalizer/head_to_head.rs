//! Head-to-head normalizer: match scores, or any pair of ranked values.
//!
//! Locates the fixture for the lookup key's two sides (and date, when the
//! schema points at one) inside a vendor event list, maps its status, and extracts one numeric value per side, swapping
//! when the vendor lists the sides in the opposite orientation.

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use settle_feeds::LookupKey;

use super::json::{date_at, decimal_at, items_at, string_at};
use super::{EventNormalizer, StatusMap};
use crate::errors::NormalizeError;
use crate::event::{names, Comparables, EventStatus, Fact, NormalizedEvent};

/// Field map for a head-to-head vendor payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadToHeadSchema {
    /// Pointer to the fixture list (or a single fixture object). Empty = root.
    #[serde(default)]
    pub events: String,

    /// Pointer, within a fixture, to its status string.
    pub status: String,

    /// Pointer to the first listed participant's name (home team, player one).
    #[serde(alias = "home_name")]
    pub first_name: String,

    /// Pointer to the second listed participant's name.
    #[serde(alias = "away_name")]
    pub second_name: String,

    /// Pointer to the first participant's value (score, points, rank).
    #[serde(alias = "home_value")]
    pub first_value: String,

    /// Pointer to the second participant's value.
    #[serde(alias = "away_value")]
    pub second_value: String,

    /// Pointer to the fixture's date. When set, only fixtures on the lookup
    /// key's date are candidates.
    #[serde(default)]
    pub date: Option<String>,

    #[serde(default)]
    pub status_map: StatusMap,
}

pub struct HeadToHeadNormalizer {
    schema: HeadToHeadSchema,
}

/// Orientation of a located fixture relative to the lookup key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Orientation {
    /// Vendor's first participant is side A.
    AsListed,
    /// Vendor's first participant is side B.
    Swapped,
}

impl HeadToHeadNormalizer {
    pub fn new(schema: HeadToHeadSchema) -> Self {
        Self { schema }
    }

    fn locate<'a>(
        &self,
        fixtures: &[&'a Value],
        key: &LookupKey,
    ) -> Result<(&'a Value, Orientation), NormalizeError> {
        match key {
            LookupKey::Match {
                date,
                side_a,
                side_b,
            } => {
                let matches: Vec<(&Value, Orientation)> = fixtures
                    .iter()
                    .filter(|fixture| match &self.schema.date {
                        Some(path) => date_at(fixture, path) == Some(*date),
                        None => true,
                    })
                    .filter_map(|fixture| {
                        let first = string_at(fixture, &self.schema.first_name)?;
                        let second = string_at(fixture, &self.schema.second_name)?;
                        if names_match(&first, side_a) && names_match(&second, side_b) {
                            Some((*fixture, Orientation::AsListed))
                        } else if names_match(&first, side_b) && names_match(&second, side_a) {
                            Some((*fixture, Orientation::Swapped))
                        } else {
                            None
                        }
                    })
                    .collect();

                match matches.as_slice() {
                    [single] => Ok(*single),
                    [] => Err(NormalizeError::Ambiguous(format!(
                        "no fixture for {} vs {} on {}",
                        side_a, side_b, date
                    ))),
                    many => Err(NormalizeError::Ambiguous(format!(
                        "{} fixtures for {} vs {} on {}",
                        many.len(),
                        side_a,
                        side_b,
                        date
                    ))),
                }
            }
            LookupKey::Event { id } => match fixtures {
                [single] => Ok((*single, Orientation::AsListed)),
                _ => Err(NormalizeError::Ambiguous(format!(
                    "{} records for event {}",
                    fixtures.len(),
                    id
                ))),
            },
            other => Err(NormalizeError::UnsupportedKey {
                normalizer: "head_to_head",
                key: other.kind(),
            }),
        }
    }
}

impl EventNormalizer for HeadToHeadNormalizer {
    fn name(&self) -> &'static str {
        "head_to_head"
    }

    fn normalize_payload(
        &self,
        payload: &Value,
        key: &LookupKey,
        observed_at: DateTime<Utc>,
    ) -> Result<NormalizedEvent, NormalizeError> {
        let fixtures = items_at(payload, &self.schema.events).ok_or_else(|| {
            NormalizeError::Malformed(format!("no fixture list at '{}'", self.schema.events))
        })?;

        let (fixture, orientation) = self.locate(&fixtures, key)?;

        let status = string_at(fixture, &self.schema.status)
            .map(|raw| self.schema.status_map.map(&raw))
            .unwrap_or(EventStatus::Unknown);

        let first = decimal_at(fixture, &self.schema.first_value);
        let second = decimal_at(fixture, &self.schema.second_value);
        let (side_a, side_b) = match orientation {
            Orientation::AsListed => (first, second),
            Orientation::Swapped => (second, first),
        };
        debug!(
            "Fixture located ({:?}): status={} side_a={:?} side_b={:?}",
            orientation, status, side_a, side_b
        );

        let mut comparables = Comparables::new();
        if let Some(value) = side_a {
            comparables.insert(names::SIDE_A, Fact::Number(value));
        }
        if let Some(value) = side_b {
            comparables.insert(names::SIDE_B, Fact::Number(value));
        }

        if status.is_final() {
            NormalizedEvent::finalized(comparables, &[names::SIDE_A, names::SIDE_B], observed_at)
        } else {
            Ok(NormalizedEvent::pending(status, comparables, observed_at))
        }
    }
}

/// Every word of the shorter name appears as a whole word in the longer one.
///
/// "Celtics" matches "Boston Celtics"; "LA" does not match "Atlanta Hawks".
fn names_match(vendor: &str, wanted: &str) -> bool {
    let vendor_words = words(vendor);
    let wanted_words = words(wanted);
    if vendor_words.is_empty() || wanted_words.is_empty() {
        return false;
    }
    let (short, long) = if vendor_words.len() <= wanted_words.len() {
        (&vendor_words, &wanted_words)
    } else {
        (&wanted_words, &vendor_words)
    };
    short.iter().all(|w| long.contains(w))
}

fn words(name: &str) -> Vec<String> {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}
