//! Resolution engine: one fetch -> normalize -> decide pass per market.
//!
//! The engine never fails to its caller. Transport problems arrive as a
//! `FetchFailure` value, payload problems are folded into `UNKNOWN` by the
//! normalizer, and the decision step is total.

use std::sync::Arc;

use log::{info, warn};
use settle_feeds::{
    DataSourceAdapter, FetchDiagnostics, FetchFailure, HttpJsonSource, RawRecord, RecordSource,
};

use crate::clock::{Clock, SystemClock};
use crate::decision::decide;
use crate::errors::Result;
use crate::event::NormalizedEvent;
use crate::market::{MarketFile, MarketSpec, OutcomeCode, Recommendation};
use crate::normalizer::EventNormalizer;
use crate::settings::FetchSettings;

/// Pipeline stages, recorded in the order they were entered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Start,
    Fetching,
    Normalizing,
    Deciding,
    Emitted,
}

/// Outcome of resolving one market.
#[derive(Clone, Debug)]
pub struct Resolution {
    pub market_id: String,
    pub code: OutcomeCode,
    pub recommendation: Recommendation,
    pub event: NormalizedEvent,
    pub stages: Vec<Stage>,
    /// Attempt trail. Empty when resolving an already-fetched record.
    pub diagnostics: FetchDiagnostics,
    pub fetch_failure: Option<FetchFailure>,
}

/// Names of the effective endpoints whose auth mode has no key.
pub fn missing_credentials(file: &MarketFile, settings: &FetchSettings) -> Vec<String> {
    std::iter::once(settings.primary_endpoint(&file.primary))
        .chain(settings.secondary_endpoint(file.secondary.as_ref()))
        .filter(|endpoint| endpoint.auth.is_missing_key())
        .map(|endpoint| endpoint.name)
        .collect()
}

pub struct ResolutionEngine {
    adapter: DataSourceAdapter,
    normalizer: Box<dyn EventNormalizer>,
    clock: Arc<dyn Clock>,
}

impl ResolutionEngine {
    pub fn new(adapter: DataSourceAdapter, normalizer: Box<dyn EventNormalizer>) -> Self {
        Self {
            adapter,
            normalizer,
            clock: Arc::new(SystemClock),
        }
    }

    /// Wire HTTP sources, retry policy and normalizer for a market file.
    ///
    /// Fails if an overridden endpoint URL cannot be filled from the
    /// market's lookup key. Endpoints that expect an API key but have none
    /// are still wired, with a warning.
    pub fn from_market_file(file: &MarketFile, settings: &FetchSettings) -> Result<Self> {
        for name in missing_credentials(file, settings) {
            warn!(
                "Endpoint '{}' of market {} expects an API key but none is configured",
                name, file.market.id
            );
        }

        let primary = settings.primary_endpoint(&file.primary);
        file.check_endpoint(&primary)?;

        let primary: Arc<dyn RecordSource> =
            Arc::new(HttpJsonSource::with_timeout(primary, settings.timeout));
        let mut adapter = DataSourceAdapter::new(primary).with_policy(settings.retry.clone());

        if let Some(secondary) = settings.secondary_endpoint(file.secondary.as_ref()) {
            file.check_endpoint(&secondary)?;
            adapter = adapter.with_secondary(Arc::new(HttpJsonSource::with_timeout(
                secondary,
                settings.timeout,
            )));
        }

        Ok(Self::new(adapter, file.schema.build()))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Fetch, normalize and decide.
    pub async fn resolve(&self, spec: &MarketSpec) -> Resolution {
        let stages = vec![Stage::Start, Stage::Fetching];
        let (fetched, diagnostics) = self.adapter.fetch_with_diagnostics(&spec.lookup).await;
        info!("Market {}: fetch {}", spec.id, diagnostics.summary());
        self.finish(spec, fetched, diagnostics, stages)
    }

    /// Decide from an outcome fetched earlier (replays, tests).
    pub fn resolve_fetched(
        &self,
        spec: &MarketSpec,
        fetched: std::result::Result<RawRecord, FetchFailure>,
    ) -> Resolution {
        self.finish(spec, fetched, FetchDiagnostics::new(), vec![Stage::Start])
    }

    fn finish(
        &self,
        spec: &MarketSpec,
        fetched: std::result::Result<RawRecord, FetchFailure>,
        diagnostics: FetchDiagnostics,
        mut stages: Vec<Stage>,
    ) -> Resolution {
        let now = self.clock.now();

        stages.push(Stage::Normalizing);
        let event = self.normalizer.normalize(&fetched, &spec.lookup, now);

        stages.push(Stage::Deciding);
        let code = decide(&event, spec, now);
        let recommendation = spec.outcomes.recommendation_for(code);
        stages.push(Stage::Emitted);

        info!(
            "Market {}: status={} code={} recommendation={}",
            spec.id,
            event.status(),
            code,
            recommendation
        );

        Resolution {
            market_id: spec.id.clone(),
            code,
            recommendation,
            event,
            stages,
            diagnostics,
            fetch_failure: fetched.err(),
        }
    }
}
