use std::io::{self, Write};

use crate::market::{OutcomeCode, OutcomeMap};

/// Renders outcome codes as `recommendation: pN` lines.
#[derive(Clone, Copy, Debug, Default)]
pub struct RecommendationEmitter {
    outcomes: OutcomeMap,
}

impl RecommendationEmitter {
    pub fn new(outcomes: OutcomeMap) -> Self {
        Self { outcomes }
    }

    pub fn render(&self, code: OutcomeCode) -> String {
        format!(
            "recommendation: {}",
            self.outcomes.recommendation_for(code)
        )
    }

    /// Write exactly one line.
    pub fn emit<W: Write>(&self, code: OutcomeCode, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self.render(code))?;
        out.flush()
    }

    /// The line printed when nothing could be resolved at all.
    pub fn emit_unresolved<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.emit(OutcomeCode::Unresolved, out)
    }
}
