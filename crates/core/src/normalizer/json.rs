//! Typed reads out of vendor JSON through JSON pointers.
//!
//! Field paths are RFC 6901 pointers (`/fixture/status/short`, `/3` for the
//! fourth element of an array). An empty path addresses the value itself.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

/// Epoch values above this are milliseconds, below are seconds.
const EPOCH_MILLIS_CUTOFF: i64 = 100_000_000_000;

pub fn at<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        Some(value)
    } else {
        value.pointer(path)
    }
}

/// The list at `path`; a single object is treated as a one-element list.
pub fn items_at<'a>(value: &'a Value, path: &str) -> Option<Vec<&'a Value>> {
    match at(value, path)? {
        Value::Array(items) => Some(items.iter().collect()),
        Value::Null => None,
        other => Some(vec![other]),
    }
}

/// Strings are returned as-is; numbers and booleans are stringified.
pub fn string_at(value: &Value, path: &str) -> Option<String> {
    match at(value, path)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Numbers and numeric strings (exchanges often quote prices as strings).
pub fn decimal_at(value: &Value, path: &str) -> Option<Decimal> {
    match at(value, path)? {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    }
}

/// Epoch seconds/milliseconds (numeric or string) or RFC 3339 text.
pub fn timestamp_at(value: &Value, path: &str) -> Option<DateTime<Utc>> {
    match at(value, path)? {
        Value::Number(n) => n.as_i64().and_then(from_epoch),
        Value::String(s) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(epoch) => from_epoch(epoch),
                Err(_) => DateTime::parse_from_rfc3339(s)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc)),
            }
        }
        _ => None,
    }
}

/// Calendar date of a timestamp, or the leading `YYYY-MM-DD` of a string
/// (`2024-03-09`, `2024-03-09T00:00:00` without an offset).
pub fn date_at(value: &Value, path: &str) -> Option<NaiveDate> {
    if let Some(timestamp) = timestamp_at(value, path) {
        return Some(timestamp.date_naive());
    }
    let text = string_at(value, path)?;
    let prefix = text.trim().get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn from_epoch(epoch: i64) -> Option<DateTime<Utc>> {
    if epoch.abs() >= EPOCH_MILLIS_CUTOFF {
        Utc.timestamp_millis_opt(epoch).single()
    } else {
        Utc.timestamp_opt(epoch, 0).single()
    }
}
