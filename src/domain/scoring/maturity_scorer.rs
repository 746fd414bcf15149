//! Maturity Scorer - personal and relationship maturity from answers.

use serde::{Deserialize, Serialize};

use super::weights::WeightTable;
use super::{round_to, ScoredAnswer};
use crate::domain::questionnaire::{AnswerOption, Polarity, SCALE_MAX, SCALE_MIDPOINT, SCALE_MIN};

const KEYWORD_STEP: f64 = 0.5;
const KEYWORD_LIMIT: f64 = 1.0;
const EXTREME_STEP: f64 = 0.75;
const EXTREME_LIMIT: f64 = 1.5;

/// An option's level after indicator adjustments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustedLevel {
    pub value: f64,
    /// True if an extreme indicator fired and the zone clamp was lifted.
    pub extreme: bool,
}

/// Applies indicator adjustments to an option's base level.
///
/// Ordinary answers stay inside their zone's scoring band; an extreme
/// indicator lifts that clamp so the value may range over the full scale.
pub fn adjusted_level(option: &AnswerOption) -> AdjustedLevel {
    let positive = option.count(Polarity::Positive) as f64;
    let negative = option.count(Polarity::Negative) as f64;
    let extreme_positive = option.count(Polarity::ExtremePositive) as f64;
    let extreme_negative = option.count(Polarity::ExtremeNegative) as f64;

    let keyword = (KEYWORD_STEP * (positive - negative)).clamp(-KEYWORD_LIMIT, KEYWORD_LIMIT);
    let boost = (EXTREME_STEP * extreme_positive).min(EXTREME_LIMIT);
    let penalty = (EXTREME_STEP * extreme_negative).min(EXTREME_LIMIT);
    let raw = f64::from(option.level) + keyword + boost - penalty;

    let extreme = extreme_positive + extreme_negative > 0.0;
    let value = if extreme {
        raw
    } else {
        option.zone.scoring_band().clamp(raw)
    };

    AdjustedLevel {
        value: value.clamp(SCALE_MIN, SCALE_MAX),
        extreme,
    }
}

/// The two maturity scores, each in [1, 12] with one decimal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaturityScores {
    pub personal: f64,
    pub relationship: f64,
}

impl MaturityScores {
    pub fn average(&self) -> f64 {
        (self.personal + self.relationship) / 2.0
    }

    pub fn gap(&self) -> f64 {
        round_to((self.personal - self.relationship).abs(), 1)
    }
}

/// Computes maturity scores as weighted means of adjusted levels.
pub struct MaturityScorer<'w> {
    weights: &'w WeightTable,
}

impl<'w> MaturityScorer<'w> {
    pub fn new(weights: &'w WeightTable) -> Self {
        Self { weights }
    }

    /// Scores both groups; `penalty` is the social-desirability penalty.
    ///
    /// Combined questions count toward both groups. A group without answers
    /// sits at the scale midpoint.
    pub fn score(&self, answers: &[ScoredAnswer<'_>], penalty: f64) -> MaturityScores {
        let personal = self.group_score(
            answers.iter().filter(|a| a.question.aspect_type.feeds_personal()),
            penalty,
        );
        let relationship = self.group_score(
            answers
                .iter()
                .filter(|a| a.question.aspect_type.feeds_relationship()),
            penalty,
        );
        MaturityScores {
            personal,
            relationship,
        }
    }

    fn group_score<'a, 'b: 'a>(
        &self,
        group: impl Iterator<Item = &'a ScoredAnswer<'b>>,
        penalty: f64,
    ) -> f64 {
        match self.weighted_mean(group) {
            Some(mean) => round_to((mean - penalty).clamp(SCALE_MIN, SCALE_MAX), 1),
            None => SCALE_MIDPOINT,
        }
    }

    /// Weighted mean of adjusted levels, `None` for an empty group.
    pub fn weighted_mean<'a, 'b: 'a>(
        &self,
        group: impl Iterator<Item = &'a ScoredAnswer<'b>>,
    ) -> Option<f64> {
        let (sum, total_weight) = group.fold((0.0, 0.0), |(sum, total), answer| {
            let weight = self.weights.weight_for(answer.question);
            (sum + adjusted_level(answer.option).value * weight, total + weight)
        });
        (total_weight > 0.0).then(|| sum / total_weight)
    }
}
