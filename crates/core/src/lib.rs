//! Settle Core - outcome resolution for prediction-market questions.
//!
//! Resolves one market per call:
//!
//! ```text
//! DataSourceAdapter -> EventNormalizer -> decide -> RecommendationEmitter
//!   (settle-feeds)      (normalizer)     (decision)   (emitter)
//! ```
//!
//! Missing, ambiguous or not-yet-final data never picks a side: it resolves
//! to `UNRESOLVED` before the market deadline and `TIE_OR_VOID` after it.

pub mod clock;
pub mod decision;
pub mod emitter;
pub mod engine;
pub mod errors;
pub mod event;
pub mod market;
pub mod normalizer;
pub mod settings;

pub use clock::{Clock, FixedClock, SystemClock};
pub use decision::decide;
pub use emitter::RecommendationEmitter;
pub use engine::{missing_credentials, Resolution, ResolutionEngine, Stage};
pub use event::{names, Comparables, EventStatus, Fact, NormalizedEvent};
pub use market::{
    Comparison, DecisionRule, MarketFile, MarketSpec, OutcomeCode, OutcomeMap, Recommendation,
    TieRule,
};
pub use normalizer::{EventNormalizer, SchemaConfig, StatusMap};
pub use settings::FetchSettings;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
