//! Price-series normalizer for threshold and direction markets.
//!
//! Aggregates the candles that open inside the lookup key's window into
//! `min_low`, `max_high`, `first_open` and `last_close`.
//!
//! | Situation | Status |
//! |-----------|--------|
//! | snapshot taken before the window opens | `SCHEDULED` |
//! | no candle inside the window yet | `SCHEDULED` |
//! | window still open | `LIVE` (partial aggregates) |
//! | window closed, candles cover it without gaps | `FINAL` |
//! | window closed, series truncated or gapped | `UNKNOWN` (partial aggregates) |
//!
//! Coverage needs each candle's close: either a `close_time` pointer or a
//! fixed `interval_secs`. Close times stamped on the last millisecond of the
//! candle (Binance) are accepted within [`CLOSE_SLACK_MS`].

use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use settle_feeds::LookupKey;

use super::json::{decimal_at, items_at, timestamp_at};
use super::EventNormalizer;
use crate::errors::{Error, NormalizeError, Result};
use crate::event::{names, Comparables, EventStatus, Fact, NormalizedEvent};

/// Field map for a candle list. Binance-style klines use `/0`..`/4`, close time `/6`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandleSchema {
    /// Pointer to the candle list. Empty = root.
    #[serde(default)]
    pub candles: String,

    pub open_time: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,

    /// Pointer to the candle's close time.
    #[serde(default)]
    pub close_time: Option<String>,

    /// Candle length, used when the vendor gives no close time.
    #[serde(default)]
    pub interval_secs: Option<u32>,
}

impl CandleSchema {
    /// Layout of Binance `/api/v3/klines` rows.
    pub fn binance_klines() -> Self {
        Self {
            candles: String::new(),
            open_time: "/0".to_string(),
            open: "/1".to_string(),
            high: "/2".to_string(),
            low: "/3".to_string(),
            close: "/4".to_string(),
            close_time: Some("/6".to_string()),
            interval_secs: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match (&self.close_time, self.interval_secs) {
            (None, None) => Err(Error::InvalidMarket(
                "candles schema needs close_time or interval_secs".to_string(),
            )),
            (_, Some(0)) => Err(Error::InvalidMarket(
                "interval_secs must be greater than zero".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Tolerance between one candle's close and the next open (or window end).
pub const CLOSE_SLACK_MS: i64 = 1_000;

#[derive(Clone, Copy, Debug)]
struct Candle {
    open_time: DateTime<Utc>,
    close_time: Option<DateTime<Utc>>,
    open: Decimal,
    high: Decimal,
    low: Decimal,
    close: Decimal,
}

pub struct CandleNormalizer {
    schema: CandleSchema,
}

impl CandleNormalizer {
    pub fn new(schema: CandleSchema) -> Self {
        Self { schema }
    }

    fn parse(&self, row: &Value) -> std::result::Result<Candle, NormalizeError> {
        let field = |path: &str, what: &str| {
            decimal_at(row, path)
                .ok_or_else(|| NormalizeError::Malformed(format!("candle without {what}")))
        };
        let open_time = timestamp_at(row, &self.schema.open_time)
            .ok_or_else(|| NormalizeError::Malformed("candle without open time".to_string()))?;
        let close_time = match (&self.schema.close_time, self.schema.interval_secs) {
            (Some(path), _) => Some(timestamp_at(row, path).ok_or_else(|| {
                NormalizeError::Malformed("candle without close time".to_string())
            })?),
            (None, Some(secs)) => Some(open_time + Duration::seconds(i64::from(secs))),
            (None, None) => None,
        };

        Ok(Candle {
            open_time,
            close_time,
            open: field(&self.schema.open, "open")?,
            high: field(&self.schema.high, "high")?,
            low: field(&self.schema.low, "low")?,
            close: field(&self.schema.close, "close")?,
        })
    }
}

impl EventNormalizer for CandleNormalizer {
    fn name(&self) -> &'static str {
        "candles"
    }

    fn normalize_payload(
        &self,
        payload: &Value,
        key: &LookupKey,
        observed_at: DateTime<Utc>,
    ) -> std::result::Result<NormalizedEvent, NormalizeError> {
        let LookupKey::PriceWindow { start, end, .. } = key else {
            return Err(NormalizeError::UnsupportedKey {
                normalizer: self.name(),
                key: key.kind(),
            });
        };

        if observed_at < *start {
            return Ok(NormalizedEvent::scheduled(observed_at));
        }

        let rows = items_at(payload, &self.schema.candles).ok_or_else(|| {
            NormalizeError::Malformed(format!("no candle list at '{}'", self.schema.candles))
        })?;

        let mut candles = Vec::with_capacity(rows.len());
        for row in rows {
            let candle = self.parse(row)?;
            if candle.open_time >= *start && candle.open_time < *end {
                candles.push(candle);
            }
        }
        candles.sort_by_key(|c| c.open_time);

        let (Some(first), Some(last)) = (candles.first(), candles.last()) else {
            debug!("No candles inside the window yet");
            return Ok(NormalizedEvent::scheduled(observed_at));
        };

        let min_low = candles.iter().map(|c| c.low).min().unwrap_or(first.low);
        let max_high = candles.iter().map(|c| c.high).max().unwrap_or(first.high);
        let comparables = Comparables::new()
            .with(names::MIN_LOW, Fact::Number(min_low))
            .with(names::MAX_HIGH, Fact::Number(max_high))
            .with(names::FIRST_OPEN, Fact::Number(first.open))
            .with(names::LAST_CLOSE, Fact::Number(last.close));

        let window_closed = observed_at >= *end;
        debug!(
            "{} candles in window, min_low={} max_high={} closed={}",
            candles.len(),
            min_low,
            max_high,
            window_closed
        );

        if !window_closed {
            return Ok(NormalizedEvent::pending(
                EventStatus::Live,
                comparables,
                observed_at,
            ));
        }

        if let Err(gap) = covers_window(&candles, *start, *end) {
            warn!("Window closed but candles are incomplete: {}", gap);
            return Ok(NormalizedEvent::pending(
                EventStatus::Unknown,
                comparables,
                observed_at,
            ));
        }

        NormalizedEvent::finalized(
            comparables,
            &[
                names::MIN_LOW,
                names::MAX_HIGH,
                names::FIRST_OPEN,
                names::LAST_CLOSE,
            ],
            observed_at,
        )
    }
}

/// Candles (sorted, all opening inside `[start, end)`) span the whole window.
fn covers_window(
    candles: &[Candle],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> std::result::Result<(), String> {
    let slack = Duration::milliseconds(CLOSE_SLACK_MS);
    let mut reached = start;
    for candle in candles {
        if candle.open_time > reached + slack {
            return Err(format!("no candle between {} and {}", reached, candle.open_time));
        }
        let Some(close) = candle.close_time else {
            return Err("candle close time unknown".to_string());
        };
        reached = reached.max(close);
    }
    if reached + slack < end {
        return Err(format!("candles stop at {}, window ends {}", reached, end));
    }
    Ok(())
}
