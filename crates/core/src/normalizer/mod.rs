//! Event normalizers: vendor payloads to [`NormalizedEvent`].
//!
//! Every normalizer is driven by a JSON-pointer field map so vendor field
//! names live in market files, not in code.

mod candles;
mod head_to_head;
mod json;
mod status_map;
mod term_search;

pub use candles::{CandleNormalizer, CandleSchema};
pub use head_to_head::{HeadToHeadNormalizer, HeadToHeadSchema};
pub use status_map::StatusMap;
pub use term_search::{TermSearchNormalizer, TermSearchSchema};

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use settle_feeds::{FetchFailure, LookupKey, RawRecord};

use crate::errors::NormalizeError;
use crate::event::{names, NormalizedEvent};

/// Maps a fetch outcome onto a canonical event.
pub trait EventNormalizer: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Interpret a JSON payload for `key`.
    ///
    /// Errors are recovered by [`normalize`](Self::normalize) into an
    /// `UNKNOWN` event.
    fn normalize_payload(
        &self,
        payload: &Value,
        key: &LookupKey,
        observed_at: DateTime<Utc>,
    ) -> Result<NormalizedEvent, NormalizeError>;

    /// Total mapping from a fetch outcome to an event. Never fails.
    ///
    /// - `FetchFailure` -> `UNKNOWN`
    /// - "no record yet" -> `SCHEDULED`
    /// - payload the normalizer cannot interpret -> `UNKNOWN`
    fn normalize(
        &self,
        fetched: &Result<RawRecord, FetchFailure>,
        key: &LookupKey,
        now: DateTime<Utc>,
    ) -> NormalizedEvent {
        let record = match fetched {
            Ok(record) => record,
            Err(failure) => {
                warn!("No record for {} key ({}), status UNKNOWN", key.kind(), failure);
                return NormalizedEvent::unknown(now);
            }
        };

        let Some(payload) = record.payload() else {
            return NormalizedEvent::scheduled(now);
        };

        match self.normalize_payload(payload, key, now) {
            Ok(event) => event,
            Err(e) => {
                warn!(
                    "{} normalizer rejected record from '{}': {}",
                    self.name(),
                    record.source,
                    e
                );
                NormalizedEvent::unknown(now)
            }
        }
    }
}

/// Normalizer selection as written in a market file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchemaConfig {
    HeadToHead(HeadToHeadSchema),
    Candles(CandleSchema),
    TermSearch(TermSearchSchema),
}

impl SchemaConfig {
    pub fn build(&self) -> Box<dyn EventNormalizer> {
        match self {
            Self::HeadToHead(schema) => Box::new(HeadToHeadNormalizer::new(schema.clone())),
            Self::Candles(schema) => Box::new(CandleNormalizer::new(schema.clone())),
            Self::TermSearch(schema) => Box::new(TermSearchNormalizer::new(schema.clone())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::HeadToHead(_) => "head_to_head",
            Self::Candles(_) => "candles",
            Self::TermSearch(_) => "term_search",
        }
    }

    /// Comparables a final event from this normalizer carries.
    pub fn produces(&self) -> &'static [&'static str] {
        match self {
            Self::HeadToHead(_) => &[names::SIDE_A, names::SIDE_B],
            Self::Candles(_) => &[
                names::MIN_LOW,
                names::MAX_HIGH,
                names::FIRST_OPEN,
                names::LAST_CLOSE,
            ],
            Self::TermSearch(_) => &[names::TERM_FOUND, names::TERM_COUNT],
        }
    }

    /// Whether this normalizer can interpret records fetched for `key`.
    pub fn accepts(&self, key: &LookupKey) -> bool {
        matches!(
            (self, key),
            (Self::HeadToHead(_), LookupKey::Match { .. })
                | (Self::HeadToHead(_), LookupKey::Event { .. })
                | (Self::Candles(_), LookupKey::PriceWindow { .. })
                | (Self::TermSearch(_), LookupKey::TextSearch { .. })
        )
    }
}
