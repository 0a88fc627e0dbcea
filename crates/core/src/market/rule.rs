//! Decision rules: comparables of a final event to an outcome code.

use std::cmp::Ordering;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::OutcomeCode;
use crate::event::{names, Comparables};

/// What an exact tie resolves to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieRule {
    /// Tie voids the market (50/50).
    #[default]
    Void,
    /// Tie counts for side A.
    SideA,
    /// Tie counts for side B.
    SideB,
}

impl TieRule {
    pub fn outcome(&self) -> OutcomeCode {
        match self {
            Self::Void => OutcomeCode::TieOrVoid,
            Self::SideA => OutcomeCode::SideA,
            Self::SideB => OutcomeCode::SideB,
        }
    }
}

/// Threshold comparison operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    #[serde(rename = ">=", alias = "gte")]
    AtLeast,
    #[serde(rename = "<=", alias = "lte")]
    AtMost,
    #[serde(rename = ">", alias = "gt")]
    Above,
    #[serde(rename = "<", alias = "lt")]
    Below,
}

impl Comparison {
    pub fn holds(&self, value: Decimal, threshold: Decimal) -> bool {
        match self {
            Self::AtLeast => value >= threshold,
            Self::AtMost => value <= threshold,
            Self::Above => value > threshold,
            Self::Below => value < threshold,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::AtLeast => ">=",
            Self::AtMost => "<=",
            Self::Above => ">",
            Self::Below => "<",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

fn default_true() -> bool {
    true
}

fn default_presence_fact() -> String {
    names::TERM_FOUND.to_string()
}

/// Deterministic mapping from comparables to an outcome code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecisionRule {
    /// Compare `side_a` with `side_b`. Scores use `higher_wins = true`,
    /// ranking positions `false`.
    HeadToHead {
        #[serde(default = "default_true")]
        higher_wins: bool,
        #[serde(default)]
        tie: TieRule,
    },

    /// `fact op threshold` satisfied resolves to side A ("yes").
    Threshold {
        fact: String,
        op: Comparison,
        threshold: Decimal,
    },

    /// `last_close` against `first_open`: up is side A, down side B.
    Direction {
        #[serde(default)]
        tie: TieRule,
    },

    /// A boolean fact: true is side A.
    Presence {
        #[serde(default = "default_presence_fact")]
        fact: String,
    },
}

impl DecisionRule {
    /// Comparables this rule reads.
    pub fn required_comparables(&self) -> Vec<&str> {
        match self {
            Self::HeadToHead { .. } => vec![names::SIDE_A, names::SIDE_B],
            Self::Threshold { fact, .. } => vec![fact.as_str()],
            Self::Direction { .. } => vec![names::FIRST_OPEN, names::LAST_CLOSE],
            Self::Presence { fact } => vec![fact.as_str()],
        }
    }

    /// Apply the rule. `None` when a comparable is missing or has the wrong
    /// type; callers fall back to the non-final ladder.
    pub fn apply(&self, comparables: &Comparables) -> Option<OutcomeCode> {
        match self {
            Self::HeadToHead { higher_wins, tie } => {
                let a = comparables.number(names::SIDE_A)?;
                let b = comparables.number(names::SIDE_B)?;
                let ordering = if *higher_wins { a.cmp(&b) } else { b.cmp(&a) };
                Some(match ordering {
                    Ordering::Greater => OutcomeCode::SideA,
                    Ordering::Less => OutcomeCode::SideB,
                    Ordering::Equal => tie.outcome(),
                })
            }
            Self::Threshold {
                fact,
                op,
                threshold,
            } => {
                let value = comparables.number(fact)?;
                Some(if op.holds(value, *threshold) {
                    OutcomeCode::SideA
                } else {
                    OutcomeCode::SideB
                })
            }
            Self::Direction { tie } => {
                let open = comparables.number(names::FIRST_OPEN)?;
                let close = comparables.number(names::LAST_CLOSE)?;
                Some(match close.cmp(&open) {
                    Ordering::Greater => OutcomeCode::SideA,
                    Ordering::Less => OutcomeCode::SideB,
                    Ordering::Equal => tie.outcome(),
                })
            }
            Self::Presence { fact } => Some(if comparables.flag(fact)? {
                OutcomeCode::SideA
            } else {
                OutcomeCode::SideB
            }),
        }
    }
}
