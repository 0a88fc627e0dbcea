use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Closed set of internal resolution outcomes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeCode {
    SideA,
    SideB,
    TieOrVoid,
    Unresolved,
}

impl OutcomeCode {
    pub const ALL: [OutcomeCode; 4] = [
        OutcomeCode::SideA,
        OutcomeCode::SideB,
        OutcomeCode::TieOrVoid,
        OutcomeCode::Unresolved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SideA => "SIDE_A",
            Self::SideB => "SIDE_B",
            Self::TieOrVoid => "TIE_OR_VOID",
            Self::Unresolved => "UNRESOLVED",
        }
    }
}

impl fmt::Display for OutcomeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External recommendation vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    P1,
    P2,
    P3,
    P4,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::P1 => "p1",
            Self::P2 => "p2",
            Self::P3 => "p3",
            Self::P4 => "p4",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Market-specific mapping from outcome codes to recommendations.
///
/// Must be injective; checked by [`OutcomeMap::validate`] when a market is
/// loaded. The default follows the common convention where the home side
/// (side A) is `p2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutcomeMap {
    pub side_a: Recommendation,
    pub side_b: Recommendation,
    pub tie_or_void: Recommendation,
    pub unresolved: Recommendation,
}

impl Default for OutcomeMap {
    fn default() -> Self {
        Self {
            side_a: Recommendation::P2,
            side_b: Recommendation::P1,
            tie_or_void: Recommendation::P3,
            unresolved: Recommendation::P4,
        }
    }
}

impl OutcomeMap {
    pub fn recommendation_for(&self, code: OutcomeCode) -> Recommendation {
        match code {
            OutcomeCode::SideA => self.side_a,
            OutcomeCode::SideB => self.side_b,
            OutcomeCode::TieOrVoid => self.tie_or_void,
            OutcomeCode::Unresolved => self.unresolved,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen: Vec<(Recommendation, OutcomeCode)> = Vec::with_capacity(4);
        for code in OutcomeCode::ALL {
            let recommendation = self.recommendation_for(code);
            if let Some((_, other)) = seen.iter().find(|(r, _)| *r == recommendation) {
                return Err(Error::InvalidMarket(format!(
                    "outcome map is not injective: {} and {} both map to {}",
                    other, code, recommendation
                )));
            }
            seen.push((recommendation, code));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_map() {
        let map = OutcomeMap::default();
        assert!(map.validate().is_ok());
        assert_eq!(map.recommendation_for(OutcomeCode::SideA), Recommendation::P2);
        assert_eq!(map.recommendation_for(OutcomeCode::SideB), Recommendation::P1);
        assert_eq!(map.recommendation_for(OutcomeCode::TieOrVoid), Recommendation::P3);
        assert_eq!(map.recommendation_for(OutcomeCode::Unresolved), Recommendation::P4);
    }

    #[test]
    fn test_non_injective_map_is_rejected() {
        let map = OutcomeMap {
            side_a: Recommendation::P1,
            ..OutcomeMap::default()
        };
        let err = map.validate().unwrap_err();
        assert!(err.to_string().contains("SIDE_A and SIDE_B both map to p1"));
    }

    #[test]
    fn test_partial_map_deserializes_over_defaults() {
        let map: OutcomeMap =
            serde_json::from_str(r#"{"side_a": "p1", "side_b": "p2"}"#).unwrap();
        assert_eq!(map.side_a, Recommendation::P1);
        assert_eq!(map.side_b, Recommendation::P2);
        assert_eq!(map.unresolved, Recommendation::P4);
        assert!(map.validate().is_ok());
    }
}
