//! Result Aggregator - assembles the final assessment report.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::{
    confidence, consistency, level_distribution, round_to, ConfidenceInputs,
    ContradictionDetector, ContradictionReport, GapAnalysis, GapAnalyzer, MaturityScorer,
    ScoredAnswer, SocialDesirabilityDetector, SocialDesirabilityReport, WeightTable,
    ZoneConfidence,
};
use crate::domain::questionnaire::{Indicator, Phase, Zone, SCALE_MAX, SCALE_MIN};

/// Gap above which the lower score decides the zone.
const LOWER_SCORE_GAP: f64 = 3.0;

/// Gap above which the lower score is further discounted.
const DISCOUNT_GAP: f64 = 4.0;
const DISCOUNT: f64 = 1.5;

/// Occurrences of one indicator across scored answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorCount {
    pub indicator: Indicator,
    pub count: usize,
}

/// Immutable snapshot of a completed assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub personal_maturity: f64,
    pub relationship_maturity: f64,
    pub detected_zone: Zone,
    pub confidence: f64,
    pub consistency: f64,
    /// Percentage per integer level, keys 1..=12.
    pub level_distribution: BTreeMap<u8, f64>,
    pub maturity_gap: f64,
    pub gap_analysis: GapAnalysis,
    pub contradictions: ContradictionReport,
    pub validation_score: f64,
    pub indicators: Vec<IndicatorCount>,
    pub social_desirability: SocialDesirabilityReport,
    pub zone_confidence: ZoneConfidence,
    pub answered_count: usize,
}

/// Combines every scoring service into an [`AssessmentResult`].
#[derive(Debug, Clone, Default)]
pub struct ResultAggregator {
    weights: WeightTable,
}

impl ResultAggregator {
    pub fn new(weights: WeightTable) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    /// Builds the result from scored answers.
    ///
    /// `answers` holds only scored answers; `zone_confidence` is taken from
    /// the session as-is.
    pub fn aggregate(
        &self,
        answers: &[ScoredAnswer<'_>],
        zone_confidence: ZoneConfidence,
    ) -> AssessmentResult {
        let social_desirability = SocialDesirabilityDetector::analyze(answers);
        let scores = MaturityScorer::new(&self.weights).score(answers, social_desirability.penalty);
        let consistency = consistency(answers);
        let contradictions = ContradictionDetector::detect(answers, &scores, consistency);
        let gap_analysis = GapAnalyzer::analyze(scores.personal, scores.relationship);

        let confidence = confidence(ConfidenceInputs {
            answer_count: answers.len(),
            consistency,
            gap: gap_analysis.gap,
            contradiction_severity: contradictions.effective_severity(),
            social_desirability_penalty: social_desirability.penalty,
        });

        let detected_zone = Zone::classify(zone_basis(scores.personal, scores.relationship));

        AssessmentResult {
            personal_maturity: scores.personal,
            relationship_maturity: scores.relationship,
            detected_zone,
            confidence,
            consistency,
            level_distribution: level_distribution(answers, &self.weights),
            maturity_gap: gap_analysis.gap,
            gap_analysis,
            contradictions,
            validation_score: validation_score(answers),
            indicators: indicator_summary(answers),
            social_desirability,
            zone_confidence,
            answered_count: answers.len(),
        }
    }
}

/// Value the detected zone is classified from.
///
/// The average of both scores, unless the gap is large enough that the
/// higher score would mask the lower one.
fn zone_basis(personal: f64, relationship: f64) -> f64 {
    let gap = round_to((personal - relationship).abs(), 1);
    let lower = personal.min(relationship);
    if gap > DISCOUNT_GAP {
        (lower - DISCOUNT).max(SCALE_MIN)
    } else if gap > LOWER_SCORE_GAP {
        lower
    } else {
        ((personal + relationship) / 2.0).clamp(SCALE_MIN, SCALE_MAX)
    }
}

/// Agreement between validation answers and the rest, in [0, 1].
fn validation_score(answers: &[ScoredAnswer<'_>]) -> f64 {
    let (validation, rest): (Vec<&ScoredAnswer<'_>>, Vec<&ScoredAnswer<'_>>) = answers
        .iter()
        .partition(|a| a.question.phase == Phase::Validation);
    if validation.is_empty() || rest.is_empty() {
        return 1.0;
    }

    let baseline = rest.iter().map(|a| a.level()).sum::<f64>() / rest.len() as f64;
    let agreement = validation
        .iter()
        .map(|a| 1.0 - (a.level() - baseline).abs() / (SCALE_MAX - SCALE_MIN))
        .sum::<f64>()
        / validation.len() as f64;
    round_to(agreement.clamp(0.0, 1.0), 2)
}

fn indicator_summary(answers: &[ScoredAnswer<'_>]) -> Vec<IndicatorCount> {
    let mut counts: HashMap<Indicator, usize> = HashMap::new();
    for indicator in answers.iter().flat_map(|a| a.option.indicators.iter()) {
        *counts.entry(*indicator).or_insert(0) += 1;
    }
    let mut summary: Vec<IndicatorCount> = counts
        .into_iter()
        .map(|(indicator, count)| IndicatorCount { indicator, count })
        .collect();
    summary.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.indicator.name().cmp(&b.indicator.name()))
    });
    summary
}
