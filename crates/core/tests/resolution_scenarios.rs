//! End-to-end resolutions against scripted record sources.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};
use settle_core::{
    missing_credentials, EventStatus, FetchSettings, FixedClock, MarketFile, OutcomeCode, RecommendationEmitter,
    ResolutionEngine, Stage,
};
use settle_feeds::{
    DataSourceAdapter, FailureReason, FetchError, LookupKey, RawRecord, RecordSource, RetryPolicy,
};

/// Source that replays a script of responses, repeating the last one.
struct ScriptedSource {
    id: &'static str,
    script: Mutex<VecDeque<Result<Value, FetchError>>>,
    calls: AtomicU32,
}

impl ScriptedSource {
    fn new(id: &'static str, script: Vec<Result<Value, FetchError>>) -> Arc<Self> {
        Arc::new(Self {
            id,
            script: Mutex::new(script.into()),
            calls: AtomicU32::new(0),
        })
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordSource for ScriptedSource {
    fn id(&self) -> &str {
        self.id
    }

    async fn fetch(&self, _key: &LookupKey) -> Result<RawRecord, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = {
            let mut script = self.script.lock().unwrap();
            if script.len() > 1 {
                script.pop_front().unwrap()
            } else {
                script.front().cloned().unwrap()
            }
        };
        next.map(|value| RawRecord::json(self.id, Utc::now(), value))
    }
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_delay: StdDuration::from_millis(1),
        multiplier: 2,
        max_delay: StdDuration::from_millis(5),
    }
}

fn rate_limited(endpoint: &str) -> Result<Value, FetchError> {
    Err(FetchError::RateLimited {
        endpoint: endpoint.to_string(),
        retry_after: None,
    })
}

fn nba_market() -> MarketFile {
    MarketFile::from_json(
        &json!({
            "market": {
                "id": "nba-2024-03-09-bos-den",
                "lookup": {
                    "kind": "match",
                    "date": "2024-03-09",
                    "side_a": "Boston Celtics",
                    "side_b": "Denver Nuggets"
                },
                "rule": {"kind": "head_to_head"},
                "deadline": "2024-03-12T00:00:00Z"
            },
            "schema": {
                "kind": "head_to_head",
                "events": "/games",
                "status": "/status",
                "home_name": "/home/name",
                "away_name": "/away/name",
                "home_value": "/home/score",
                "away_value": "/away/score"
            },
            "primary": {"name": "primary", "url": "https://scores.test/games/{date}"}
        })
        .to_string(),
    )
    .unwrap()
}

fn btc_market() -> MarketFile {
    MarketFile::from_json(
        &json!({
            "market": {
                "id": "btc-dip-80k-nov",
                "lookup": {
                    "kind": "price_window",
                    "symbol": "BTCUSDT",
                    "start": "2024-11-01T00:00:00Z",
                    "end": "2024-11-01T03:00:00Z"
                },
                "rule": {"kind": "threshold", "fact": "min_low", "op": "<=", "threshold": 80000},
                "outcomes": {"side_a": "p2", "side_b": "p1"},
                "deadline": "2024-11-02T00:00:00Z"
            },
            "schema": {
                "kind": "candles",
                "open_time": "/0",
                "open": "/1",
                "high": "/2",
                "low": "/3",
                "close": "/4",
                "interval_secs": 3600
            },
            "primary": {
                "name": "binance",
                "url": "https://api.binance.test/api/v3/klines?symbol={symbol}&startTime={start_ms}&endTime={end_ms}"
            }
        })
        .to_string(),
    )
    .unwrap()
}

fn game(status: &str, home: Value, away: Value) -> Value {
    json!({"games": [{
        "status": status,
        "home": {"name": "Boston Celtics", "score": home},
        "away": {"name": "Denver Nuggets", "score": away}
    }]})
}

fn engine(file: &MarketFile, adapter: DataSourceAdapter, now: DateTime<Utc>) -> ResolutionEngine {
    ResolutionEngine::new(adapter, file.schema.build()).with_clock(Arc::new(FixedClock(now)))
}

fn before_deadline(file: &MarketFile) -> DateTime<Utc> {
    file.market.deadline - Duration::hours(6)
}

fn after_deadline(file: &MarketFile) -> DateTime<Utc> {
    file.market.deadline + Duration::hours(6)
}

fn emitted(file: &MarketFile, code: OutcomeCode) -> String {
    let mut out = Vec::new();
    RecommendationEmitter::new(file.market.outcomes)
        .emit(code, &mut out)
        .unwrap();
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn home_win_recommends_p2() {
    let file = nba_market();
    let primary = ScriptedSource::new("primary", vec![Ok(game("Final", json!(5), json!(3)))]);
    let adapter = DataSourceAdapter::new(primary).with_policy(fast_policy());

    let resolution = engine(&file, adapter, before_deadline(&file))
        .resolve(&file.market)
        .await;

    assert_eq!(resolution.code, OutcomeCode::SideA);
    assert_eq!(emitted(&file, resolution.code), "recommendation: p2\n");
    assert_eq!(
        resolution.stages,
        vec![
            Stage::Start,
            Stage::Fetching,
            Stage::Normalizing,
            Stage::Deciding,
            Stage::Emitted
        ]
    );
    assert!(resolution.fetch_failure.is_none());
}

#[tokio::test]
async fn price_dip_below_threshold_resolves_yes() {
    let file = btc_market();
    let hour = |h: u32| Utc.with_ymd_and_hms(2024, 11, 1, h, 0, 0).unwrap().timestamp_millis();
    let candles = json!([
        [hour(0), "81000", "81500", "80200", "80900"],
        [hour(1), "80900", "81200", "79500", "80100"],
        [hour(2), "80100", "82000", "80050", "81800"]
    ]);
    let primary = ScriptedSource::new("binance", vec![Ok(candles)]);
    let adapter = DataSourceAdapter::new(primary).with_policy(fast_policy());
    let now = Utc.with_ymd_and_hms(2024, 11, 1, 4, 0, 0).unwrap();

    let resolution = engine(&file, adapter, now).resolve(&file.market).await;

    assert_eq!(resolution.event.status(), EventStatus::Final);
    assert_eq!(resolution.code, OutcomeCode::SideA);
    assert_eq!(emitted(&file, resolution.code), "recommendation: p2\n");
}

#[tokio::test]
async fn truncated_price_series_never_picks_a_side() {
    let file = btc_market();
    let first_hour = Utc.with_ymd_and_hms(2024, 11, 1, 0, 0, 0).unwrap().timestamp_millis();
    let candles = json!([[first_hour, "81000", "81500", "80200", "80900"]]);
    let now = Utc.with_ymd_and_hms(2024, 11, 1, 4, 0, 0).unwrap();

    for (now, expected) in [
        (now, "recommendation: p4\n"),
        (after_deadline(&file), "recommendation: p3\n"),
    ] {
        let primary = ScriptedSource::new("binance", vec![Ok(candles.clone())]);
        let adapter = DataSourceAdapter::new(primary).with_policy(fast_policy());
        let resolution = engine(&file, adapter, now).resolve(&file.market).await;
        assert_eq!(resolution.event.status(), EventStatus::Unknown);
        assert_eq!(emitted(&file, resolution.code), expected);
    }
}

#[tokio::test]
async fn exhausted_rate_limit_without_proxy_recommends_p4() {
    let file = nba_market();
    let primary = ScriptedSource::new("primary", vec![rate_limited("primary")]);
    let adapter = DataSourceAdapter::new(primary.clone()).with_policy(fast_policy());

    let resolution = engine(&file, adapter, before_deadline(&file))
        .resolve(&file.market)
        .await;

    assert_eq!(primary.calls(), 3);
    assert_eq!(resolution.event.status(), EventStatus::Unknown);
    assert_eq!(
        resolution.fetch_failure.as_ref().map(|f| f.reason),
        Some(FailureReason::RateLimited)
    );
    assert_eq!(emitted(&file, resolution.code), "recommendation: p4\n");
}

#[tokio::test]
async fn rate_limited_primary_falls_back_to_proxy() {
    let file = nba_market();
    let primary = ScriptedSource::new("primary", vec![rate_limited("primary")]);
    let proxy = ScriptedSource::new("proxy", vec![Ok(game("FT", json!(98), json!(101)))]);
    let adapter = DataSourceAdapter::new(primary.clone())
        .with_secondary(proxy.clone())
        .with_policy(fast_policy());

    let resolution = engine(&file, adapter, before_deadline(&file))
        .resolve(&file.market)
        .await;

    assert_eq!(primary.calls(), 3);
    assert_eq!(proxy.calls(), 1);
    assert_eq!(resolution.code, OutcomeCode::SideB);
    assert_eq!(emitted(&file, resolution.code), "recommendation: p1\n");
}

#[tokio::test]
async fn postponed_waits_until_deadline_then_voids() {
    let file = nba_market();
    let payload = game("Postponed", Value::Null, Value::Null);

    for (now, expected) in [
        (before_deadline(&file), "recommendation: p4\n"),
        (after_deadline(&file), "recommendation: p3\n"),
    ] {
        let primary = ScriptedSource::new("primary", vec![Ok(payload.clone())]);
        let adapter = DataSourceAdapter::new(primary).with_policy(fast_policy());
        let resolution = engine(&file, adapter, now).resolve(&file.market).await;
        assert_eq!(resolution.event.status(), EventStatus::Postponed);
        assert_eq!(emitted(&file, resolution.code), expected);
    }
}

#[tokio::test]
async fn no_record_yet_is_unresolved() {
    let file = nba_market();
    let primary = ScriptedSource::new("primary", vec![Ok(json!([]))]);
    let adapter = DataSourceAdapter::new(primary).with_policy(fast_policy());

    let resolution = engine(&file, adapter, before_deadline(&file))
        .resolve(&file.market)
        .await;

    assert_eq!(resolution.event.status(), EventStatus::Scheduled);
    assert_eq!(resolution.code, OutcomeCode::Unresolved);
}

#[tokio::test]
async fn final_without_scores_is_never_a_side() {
    let file = nba_market();
    let primary = ScriptedSource::new("primary", vec![Ok(game("Final", json!(5), Value::Null))]);
    let adapter = DataSourceAdapter::new(primary).with_policy(fast_policy());

    let resolution = engine(&file, adapter, after_deadline(&file))
        .resolve(&file.market)
        .await;

    assert_eq!(resolution.event.status(), EventStatus::Unknown);
    assert_eq!(resolution.code, OutcomeCode::TieOrVoid);
}

#[test]
fn replay_matches_live_resolution() {
    let file = nba_market();
    let primary = ScriptedSource::new("primary", vec![Ok(Value::Null)]);
    let engine = engine(
        &file,
        DataSourceAdapter::new(primary.clone()),
        before_deadline(&file),
    );
    let fetched = Ok(RawRecord::json(
        "archive",
        before_deadline(&file),
        game("Final", json!(110), json!(110)),
    ));

    let resolution = engine.resolve_fetched(&file.market, fetched);

    assert_eq!(primary.calls(), 0);
    assert_eq!(resolution.code, OutcomeCode::TieOrVoid);
    assert_eq!(
        resolution.stages,
        vec![Stage::Start, Stage::Normalizing, Stage::Deciding, Stage::Emitted]
    );
    assert!(resolution.diagnostics.attempts.is_empty());
}

#[test]
fn unfillable_endpoint_override_is_rejected() {
    let file = nba_market();
    let settings = FetchSettings {
        primary_url: Some("https://scores.test/{symbol}".to_string()),
        ..FetchSettings::default()
    };
    assert!(ResolutionEngine::from_market_file(&file, &settings).is_err());
    assert!(ResolutionEngine::from_market_file(&file, &FetchSettings::default()).is_ok());
}

#[test]
fn keyless_authenticated_endpoint_is_reported() {
    let file = MarketFile::from_json(include_str!("../../../markets/nba-bos-den.json")).unwrap();

    assert_eq!(
        missing_credentials(&file, &FetchSettings::default()),
        vec!["sportsdata".to_string()]
    );
    assert!(ResolutionEngine::from_market_file(&file, &FetchSettings::default()).is_ok());

    let settings = FetchSettings {
        api_key: Some("secret".to_string()),
        ..FetchSettings::default()
    };
    assert!(missing_credentials(&file, &settings).is_empty());
    assert!(missing_credentials(&nba_market(), &FetchSettings::default()).is_empty());
}
