//! Scoring Module - Pure services turning answers into a maturity profile.
//!
//! # Components
//!
//! - `zone_confidence` - Distribution of answers over the four zones
//! - `WeightTable` - Per-question weights (critical, validation, category)
//! - `MaturityScorer` - Personal and relationship maturity from adjusted levels
//! - `SocialDesirabilityDetector` - Penalty for implausibly flattering profiles
//! - `ContradictionDetector` - Flags internally inconsistent answer patterns
//! - `GapAnalyzer` - Classifies the split between the two maturity scores
//! - `consistency` / `confidence` - Reliability estimates
//! - `ResultAggregator` - Assembles the final `AssessmentResult`
//!
//! All functions are pure and stateless. They operate on already resolved
//! answers ([`ScoredAnswer`]) so no bank lookups or I/O happen here.

mod confidence;
mod contradictions;
mod distribution;
mod gap_analyzer;
mod maturity_scorer;
mod result;
mod social_desirability;
mod weights;
mod zone_confidence;

pub use confidence::{confidence, consistency, ConfidenceInputs, NEUTRAL_CONSISTENCY};
pub use contradictions::{
    ContradictionDetector, ContradictionFlag, ContradictionKind, ContradictionReport, Severity,
};
pub use distribution::level_distribution;
pub use gap_analyzer::{GapAnalysis, GapAnalyzer, GapDirection, GapSeverity};
pub use maturity_scorer::{adjusted_level, AdjustedLevel, MaturityScorer, MaturityScores};
pub use result::{AssessmentResult, IndicatorCount, ResultAggregator};
pub use social_desirability::{SocialDesirabilityDetector, SocialDesirabilityReport, SdOutcome};
pub use weights::{WeightTable, DEFAULT_CRITICAL_WEIGHT, DEFAULT_VALIDATION_WEIGHT};
pub use zone_confidence::{zone_confidence, ZoneConfidence};

use crate::domain::questionnaire::{AnswerOption, Question};

/// An answer resolved against the bank, ready for scoring.
#[derive(Debug, Clone, Copy)]
pub struct ScoredAnswer<'a> {
    pub question: &'a Question,
    pub option: &'a AnswerOption,
    pub response_time_ms: Option<u64>,
}

impl<'a> ScoredAnswer<'a> {
    pub fn new(question: &'a Question, option: &'a AnswerOption) -> Self {
        Self {
            question,
            option,
            response_time_ms: None,
        }
    }

    pub fn timed(mut self, response_time_ms: u64) -> Self {
        self.response_time_ms = Some(response_time_ms);
        self
    }

    /// Base level of the chosen option as a float.
    pub fn level(&self) -> f64 {
        f64::from(self.option.level)
    }
}

/// Rounds to a fixed number of decimals.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
