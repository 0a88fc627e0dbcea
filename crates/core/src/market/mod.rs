//! Market definitions: what to look up, how to decide, how to report.

mod file;
mod outcome;
mod rule;
mod spec;

pub use file::MarketFile;
pub use outcome::{OutcomeCode, OutcomeMap, Recommendation};
pub use rule::{Comparison, DecisionRule, TieRule};
pub use spec::MarketSpec;
