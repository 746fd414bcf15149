//! Consistency and confidence estimates.

use std::collections::HashMap;

use super::{round_to, ScoredAnswer, Severity};

/// Baseline consistency assumed before enough answers exist.
pub const NEUTRAL_CONSISTENCY: f64 = 0.7;

/// Standard deviation at which levels count as fully inconsistent.
const MAX_STD_DEV: f64 = 5.5;

/// Answers needed before the estimate stops leaning on the baseline.
const FULL_WEIGHT_ANSWERS: f64 = 20.0;

const LEVEL_SHARE: f64 = 0.7;
const ZONE_SHARE: f64 = 0.3;

/// How internally consistent the answers are, in [0, 1].
pub fn consistency(answers: &[ScoredAnswer<'_>]) -> f64 {
    if answers.is_empty() {
        return NEUTRAL_CONSISTENCY;
    }
    let n = answers.len() as f64;

    let mean = answers.iter().map(ScoredAnswer::level).sum::<f64>() / n;
    let variance = answers
        .iter()
        .map(|a| (a.level() - mean).powi(2))
        .sum::<f64>()
        / n;
    let level_term = (1.0 - (variance.sqrt() / MAX_STD_DEV).sqrt()).clamp(0.0, 1.0);

    let mut zone_counts = HashMap::new();
    for answer in answers {
        *zone_counts.entry(answer.option.zone).or_insert(0usize) += 1;
    }
    let dominant = zone_counts.values().copied().max().unwrap_or(0) as f64;
    let zone_term = dominant / n;

    let blended = LEVEL_SHARE * level_term + ZONE_SHARE * zone_term;
    let weight = (n / FULL_WEIGHT_ANSWERS).min(1.0);
    round_to(weight * blended + (1.0 - weight) * NEUTRAL_CONSISTENCY, 2)
}

/// Inputs to the confidence estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceInputs {
    pub answer_count: usize,
    pub consistency: f64,
    pub gap: f64,
    /// `None` when no contradiction was flagged.
    pub contradiction_severity: Option<Severity>,
    pub social_desirability_penalty: f64,
}

const GAP_THRESHOLD: f64 = 3.0;
const GAP_STEP: f64 = 0.1;
const GAP_FLOOR: f64 = 0.3;
const CONTRADICTION_FLOOR: f64 = 0.2;
const SOCIAL_DESIRABILITY_FLOOR: f64 = 0.15;

/// Subtracts `penalty` without pushing `value` below `floor`. A value already
/// under the floor is left where it is.
fn discount(value: f64, penalty: f64, floor: f64) -> f64 {
    if penalty <= 0.0 {
        return value;
    }
    (value - penalty).max(floor.min(value))
}

/// Overall confidence in the result, in [0, 1].
pub fn confidence(inputs: ConfidenceInputs) -> f64 {
    let base = (0.3 + 0.08 * inputs.answer_count as f64).min(0.9);
    let mut value = base + 0.3 * inputs.consistency;

    let gap_penalty = GAP_STEP * (inputs.gap - GAP_THRESHOLD).max(0.0);
    value = discount(value, gap_penalty, GAP_FLOOR);

    let contradiction_penalty = match inputs.contradiction_severity {
        Some(Severity::High) => 0.35,
        Some(Severity::Medium) => 0.2,
        Some(Severity::Low) => 0.1,
        None => 0.0,
    };
    value = discount(value, contradiction_penalty, CONTRADICTION_FLOOR);

    value = discount(
        value,
        inputs.social_desirability_penalty,
        SOCIAL_DESIRABILITY_FLOOR,
    );

    round_to(value.clamp(0.0, 1.0), 2)
}
