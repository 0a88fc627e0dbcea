use anyhow::Context;
use settle_core::{MarketFile, OutcomeCode, RecommendationEmitter, ResolutionEngine};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Logs go to stderr; stdout carries only the recommendation line.
pub fn init_tracing() {
    let log_format = std::env::var("SETTLE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Load configuration and the market, then resolve it.
///
/// `emitter` switches to the market's outcome map as soon as the market file
/// is loaded, so a later failure still reports the market's unresolved code.
pub async fn run(emitter: &mut RecommendationEmitter) -> anyhow::Result<OutcomeCode> {
    let config = Config::from_env().context("Invalid configuration")?;

    let file = MarketFile::load(&config.market_file)
        .with_context(|| format!("Cannot load market {}", config.market_file.display()))?;
    *emitter = RecommendationEmitter::new(file.market.outcomes);

    let engine = ResolutionEngine::from_market_file(&file, &config.fetch)
        .context("Cannot build the resolution pipeline")?;
    tracing::info!("Resolving market {}", file.market.id);

    let resolution = engine.resolve(&file.market).await;
    if let Some(failure) = &resolution.fetch_failure {
        tracing::warn!(
            "Market {}: no record after {} attempt(s): {}",
            resolution.market_id,
            failure.attempts,
            failure
        );
    }
    Ok(resolution.code)
}
