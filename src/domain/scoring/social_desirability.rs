//! Social-Desirability Detector - penalizes implausibly flattering profiles.

use serde::{Deserialize, Serialize};

use super::{round_to, ScoredAnswer};

/// Fewer answers than this give no signal.
pub const MIN_ANSWERS: usize = 10;

/// Share of candid low answers that makes a profile trustworthy.
pub const CANDID_LOW_RATIO: f64 = 0.10;

/// Share of answers with extreme-high indicators that corroborates high scores.
pub const CORROBORATION_RATIO: f64 = 0.15;

/// Suspicion at or below this level carries no penalty.
pub const SUSPICION_THRESHOLD: f64 = 0.35;

/// Largest penalty ever applied.
pub const MAX_PENALTY: f64 = 0.8;

/// Which rule decided the penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SdOutcome {
    InsufficientAnswers,
    CandidLowAnswers,
    CorroboratedByIndicators,
    WithinTolerance,
    Penalized,
}

/// Outcome of the social-desirability analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialDesirabilityReport {
    pub penalty: f64,
    pub outcome: SdOutcome,
    pub low_ratio: f64,
    pub very_high_ratio: f64,
    pub perfect_ratio: f64,
    pub extreme_high_ratio: f64,
    pub suspicion: f64,
}

impl SocialDesirabilityReport {
    pub fn is_penalized(&self) -> bool {
        self.outcome == SdOutcome::Penalized
    }
}

#[derive(Debug, Default)]
struct Buckets {
    low: usize,
    mid: usize,
    high: usize,
    very_high: usize,
    perfect: usize,
}

impl Buckets {
    fn add(&mut self, level: u8) {
        match level {
            0..=3 => self.low += 1,
            4..=6 => self.mid += 1,
            7..=9 => self.high += 1,
            10..=11 => self.very_high += 1,
            _ => self.perfect += 1,
        }
    }
}

/// Detects answer patterns driven by wanting to look good.
pub struct SocialDesirabilityDetector;

impl SocialDesirabilityDetector {
    /// Rules are evaluated in order; the first match decides.
    pub fn analyze(answers: &[ScoredAnswer<'_>]) -> SocialDesirabilityReport {
        let total = answers.len();
        let mut buckets = Buckets::default();
        let mut extreme_high = 0usize;
        for answer in answers {
            buckets.add(answer.option.level);
            if answer.option.has_extreme_high_indicator() {
                extreme_high += 1;
            }
        }

        let ratio = |count: usize| {
            if total == 0 {
                0.0
            } else {
                count as f64 / total as f64
            }
        };
        let low_ratio = ratio(buckets.low);
        let very_high_ratio = ratio(buckets.very_high);
        let perfect_ratio = ratio(buckets.perfect);
        let extreme_high_ratio = ratio(extreme_high);

        let report = |outcome: SdOutcome, suspicion: f64, penalty: f64| SocialDesirabilityReport {
            penalty,
            outcome,
            low_ratio,
            very_high_ratio,
            perfect_ratio,
            extreme_high_ratio,
            suspicion,
        };

        if total < MIN_ANSWERS {
            return report(SdOutcome::InsufficientAnswers, 0.0, 0.0);
        }
        if low_ratio >= CANDID_LOW_RATIO {
            return report(SdOutcome::CandidLowAnswers, 0.0, 0.0);
        }
        if extreme_high_ratio >= CORROBORATION_RATIO {
            return report(SdOutcome::CorroboratedByIndicators, 0.0, 0.0);
        }

        let suspicion = 1.5 * (perfect_ratio - 0.2).max(0.0)
            + (very_high_ratio + perfect_ratio - 0.5).max(0.0);
        if suspicion <= SUSPICION_THRESHOLD {
            return report(SdOutcome::WithinTolerance, suspicion, 0.0);
        }

        let penalty = ((suspicion - 0.3) * 1.5 + perfect_ratio).min(MAX_PENALTY);
        tracing::debug!(suspicion, penalty, "social desirability penalty applied");
        report(SdOutcome::Penalized, suspicion, round_to(penalty, 3))
    }
}
