use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use settle_feeds::LookupKey;

use super::{DecisionRule, OutcomeMap};
use crate::errors::{Error, Result};

/// Everything needed to resolve one market question.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSpec {
    pub id: String,
    pub lookup: LookupKey,
    pub rule: DecisionRule,
    #[serde(default)]
    pub outcomes: OutcomeMap,
    /// After this instant an event that is still not final voids the market.
    pub deadline: DateTime<Utc>,
}

impl MarketSpec {
    /// Structural checks that do not depend on the data source.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidMarket("market id is empty".to_string()));
        }
        self.outcomes.validate()?;

        match &self.lookup {
            LookupKey::Match { side_a, side_b, .. } => {
                if side_a.trim().is_empty() || side_b.trim().is_empty() {
                    return Err(Error::InvalidMarket(format!(
                        "market {}: both sides must be named",
                        self.id
                    )));
                }
                if side_a.trim().eq_ignore_ascii_case(side_b.trim()) {
                    return Err(Error::InvalidMarket(format!(
                        "market {}: side_a and side_b are the same ({})",
                        self.id, side_a
                    )));
                }
            }
            LookupKey::PriceWindow { symbol, start, end } => {
                if symbol.trim().is_empty() {
                    return Err(Error::InvalidMarket(format!(
                        "market {}: symbol is empty",
                        self.id
                    )));
                }
                if start >= end {
                    return Err(Error::InvalidMarket(format!(
                        "market {}: window start {} is not before end {}",
                        self.id, start, end
                    )));
                }
            }
            LookupKey::Event { id } => {
                if id.trim().is_empty() {
                    return Err(Error::InvalidMarket(format!(
                        "market {}: event id is empty",
                        self.id
                    )));
                }
            }
            LookupKey::TextSearch { query, terms, .. } => {
                if query.trim().is_empty() && terms.iter().all(|t| t.trim().is_empty()) {
                    return Err(Error::InvalidMarket(format!(
                        "market {}: no search terms",
                        self.id
                    )));
                }
            }
        }

        Ok(())
    }
}
