use chrono::{DateTime, Utc};
use serde_json::Value;

/// Body of a fetched record.
#[derive(Clone, Debug, PartialEq)]
pub enum RawBody {
    /// HTTP 404 or an empty result: the vendor has no record yet.
    ///
    /// This is a valid answer, not a transport failure.
    NotFound,

    /// Vendor-shaped JSON. May be partial, or a list (e.g. price candles).
    Json(Value),
}

impl RawBody {
    /// Wrap a decoded payload, folding `null` and `[]` into [`RawBody::NotFound`].
    pub fn from_json(value: Value) -> Self {
        match &value {
            Value::Null => Self::NotFound,
            Value::Array(items) if items.is_empty() => Self::NotFound,
            _ => Self::Json(value),
        }
    }
}

/// Opaque vendor payload returned by a record source.
#[derive(Clone, Debug, PartialEq)]
pub struct RawRecord {
    /// Endpoint that produced the record.
    pub source: String,
    /// When the response was received.
    pub fetched_at: DateTime<Utc>,
    pub body: RawBody,
}

impl RawRecord {
    pub fn new(source: impl Into<String>, fetched_at: DateTime<Utc>, body: RawBody) -> Self {
        Self {
            source: source.into(),
            fetched_at,
            body,
        }
    }

    /// Record carrying a JSON payload.
    pub fn json(source: impl Into<String>, fetched_at: DateTime<Utc>, value: Value) -> Self {
        Self::new(source, fetched_at, RawBody::from_json(value))
    }

    /// Record meaning "no record yet".
    pub fn not_found(source: impl Into<String>, fetched_at: DateTime<Utc>) -> Self {
        Self::new(source, fetched_at, RawBody::NotFound)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.body, RawBody::NotFound)
    }

    pub fn payload(&self) -> Option<&Value> {
        match &self.body {
            RawBody::Json(value) => Some(value),
            RawBody::NotFound => None,
        }
    }
}
