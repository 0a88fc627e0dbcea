use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Minimal identifying tuple needed to fetch a record.
///
/// A key is built once per resolution and never mutated. Endpoint URL
/// templates address its fields by name through [`LookupKey::param`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LookupKey {
    /// A head-to-head fixture on a given day.
    Match {
        date: NaiveDate,
        side_a: String,
        side_b: String,
    },

    /// A price series for `symbol` between `start` and `end`.
    PriceWindow {
        symbol: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// An event addressed directly by the vendor's identifier.
    Event { id: String },

    /// A text search (transcripts, articles) for one or more terms.
    TextSearch {
        query: String,
        #[serde(default)]
        terms: Vec<String>,
        #[serde(default)]
        date: Option<NaiveDate>,
    },
}

impl LookupKey {
    /// Short name of the key shape, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Match { .. } => "match",
            Self::PriceWindow { .. } => "price_window",
            Self::Event { .. } => "event",
            Self::TextSearch { .. } => "text_search",
        }
    }

    /// Value of a named template parameter, or `None` if this key shape
    /// does not carry it.
    ///
    /// | Key | Parameters |
    /// |-----|------------|
    /// | `Match` | `date` (YYYY-MM-DD), `date_compact` (YYYYMMDD), `side_a`, `side_b` |
    /// | `PriceWindow` | `symbol`, `start`, `end` (RFC 3339), `start_ms`, `end_ms`, `start_s`, `end_s` |
    /// | `Event` | `id` |
    /// | `TextSearch` | `query`, `terms` (comma separated), `date`, `date_compact` |
    pub fn param(&self, name: &str) -> Option<String> {
        match self {
            Self::Match {
                date,
                side_a,
                side_b,
            } => match name {
                "date" => Some(date.format("%Y-%m-%d").to_string()),
                "date_compact" => Some(date.format("%Y%m%d").to_string()),
                "side_a" => Some(side_a.clone()),
                "side_b" => Some(side_b.clone()),
                _ => None,
            },
            Self::PriceWindow { symbol, start, end } => match name {
                "symbol" => Some(symbol.clone()),
                "start" => Some(start.to_rfc3339()),
                "end" => Some(end.to_rfc3339()),
                "start_ms" => Some(start.timestamp_millis().to_string()),
                "end_ms" => Some(end.timestamp_millis().to_string()),
                "start_s" => Some(start.timestamp().to_string()),
                "end_s" => Some(end.timestamp().to_string()),
                _ => None,
            },
            Self::Event { id } => match name {
                "id" => Some(id.clone()),
                _ => None,
            },
            Self::TextSearch { query, terms, date } => match name {
                "query" => Some(query.clone()),
                "terms" => Some(terms.join(",")),
                "date" => date.map(|d| d.format("%Y-%m-%d").to_string()),
                "date_compact" => date.map(|d| d.format("%Y%m%d").to_string()),
                _ => None,
            },
        }
    }
}
