//! Contradiction Detector - internally inconsistent answer patterns.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::{MaturityScores, ScoredAnswer};
use crate::domain::questionnaire::Indicator;

/// How seriously a flag undermines the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        };
        write!(f, "{}", s)
    }
}

/// The pattern a flag describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContradictionKind {
    /// High maturity on the surface, trauma signals underneath.
    CompensatedTrauma,
    /// Control and rigidity presented as healthy boundaries.
    ControlAsBoundaries,
    /// Near-perfect answers alongside many trauma signals.
    SocialDesirabilityWithTrauma,
    /// Many answers given too quickly to be considered.
    RushedResponding,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContradictionFlag {
    pub kind: ContradictionKind,
    pub severity: Severity,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContradictionReport {
    pub detected: bool,
    pub severity: Severity,
    pub flags: Vec<ContradictionFlag>,
}

impl ContradictionReport {
    fn from_flags(flags: Vec<ContradictionFlag>) -> Self {
        let severity = if flags.iter().any(|f| f.severity == Severity::High) {
            Severity::High
        } else if flags.iter().any(|f| f.severity == Severity::Medium) || flags.len() > 3 {
            Severity::Medium
        } else {
            Severity::Low
        };
        Self {
            detected: !flags.is_empty(),
            severity,
            flags,
        }
    }

    /// Severity of the report if anything was flagged.
    pub fn effective_severity(&self) -> Option<Severity> {
        self.detected.then_some(self.severity)
    }
}

/// Response times under this many milliseconds count as rushed.
pub const RUSHED_RESPONSE_MS: u64 = 2000;

const RUSHED_MIN_TIMED: usize = 10;
const RUSHED_RATIO: f64 = 0.4;

#[derive(Debug, Default)]
struct IndicatorTally {
    trauma: usize,
    distinct_trauma: BTreeSet<Indicator>,
    control: usize,
    healthy_boundaries: usize,
}

impl IndicatorTally {
    fn collect(answers: &[ScoredAnswer<'_>]) -> Self {
        let mut tally = Self::default();
        for indicator in answers.iter().flat_map(|a| a.option.indicators.iter()) {
            if indicator.is_trauma() {
                tally.trauma += 1;
                tally.distinct_trauma.insert(*indicator);
            }
            if indicator.is_control() {
                tally.control += 1;
            }
            if indicator.is_healthy_boundary() {
                tally.healthy_boundaries += 1;
            }
        }
        tally
    }
}

/// Evaluates every contradiction rule independently.
pub struct ContradictionDetector;

impl ContradictionDetector {
    pub fn detect(
        answers: &[ScoredAnswer<'_>],
        scores: &MaturityScores,
        consistency: f64,
    ) -> ContradictionReport {
        let tally = IndicatorTally::collect(answers);
        let flags: Vec<ContradictionFlag> = [
            Self::compensated_trauma(&tally, scores, consistency),
            Self::control_as_boundaries(&tally),
            Self::social_desirability_with_trauma(answers, &tally),
            Self::rushed_responding(answers),
        ]
        .into_iter()
        .flatten()
        .collect();

        if !flags.is_empty() {
            tracing::debug!(count = flags.len(), "contradictions detected");
        }
        ContradictionReport::from_flags(flags)
    }

    fn compensated_trauma(
        tally: &IndicatorTally,
        scores: &MaturityScores,
        consistency: f64,
    ) -> Option<ContradictionFlag> {
        (scores.average() >= 9.0 && tally.distinct_trauma.len() >= 4 && consistency < 0.5).then(
            || ContradictionFlag {
                kind: ContradictionKind::CompensatedTrauma,
                severity: Severity::High,
                description: format!(
                    "High maturity ({:.1}) with {} distinct trauma indicators and low consistency",
                    scores.average(),
                    tally.distinct_trauma.len()
                ),
            },
        )
    }

    fn control_as_boundaries(tally: &IndicatorTally) -> Option<ContradictionFlag> {
        if tally.control < 4 || tally.healthy_boundaries < 2 {
            return None;
        }
        let severity = if tally.control >= 6 {
            Severity::Medium
        } else {
            Severity::Low
        };
        Some(ContradictionFlag {
            kind: ContradictionKind::ControlAsBoundaries,
            severity,
            description: format!(
                "{} control indicators alongside {} healthy-boundary claims",
                tally.control, tally.healthy_boundaries
            ),
        })
    }

    fn social_desirability_with_trauma(
        answers: &[ScoredAnswer<'_>],
        tally: &IndicatorTally,
    ) -> Option<ContradictionFlag> {
        if answers.is_empty() {
            return None;
        }
        let total = answers.len() as f64;
        let ratio_at_least = |level: u8| {
            answers.iter().filter(|a| a.option.level >= level).count() as f64 / total
        };
        let perfect = ratio_at_least(11);
        let high = ratio_at_least(10);

        let severity = if perfect > 0.6 && tally.trauma >= 5 {
            Severity::High
        } else if high > 0.85 && tally.trauma >= 4 {
            Severity::Medium
        } else {
            return None;
        };
        Some(ContradictionFlag {
            kind: ContradictionKind::SocialDesirabilityWithTrauma,
            severity,
            description: format!(
                "{:.0}% near-perfect answers despite {} trauma indicators",
                perfect * 100.0,
                tally.trauma
            ),
        })
    }

    fn rushed_responding(answers: &[ScoredAnswer<'_>]) -> Option<ContradictionFlag> {
        let times: Vec<u64> = answers.iter().filter_map(|a| a.response_time_ms).collect();
        if times.len() < RUSHED_MIN_TIMED {
            return None;
        }
        let rushed = times.iter().filter(|ms| **ms < RUSHED_RESPONSE_MS).count();
        let ratio = rushed as f64 / times.len() as f64;
        (ratio >= RUSHED_RATIO).then(|| ContradictionFlag {
            kind: ContradictionKind::RushedResponding,
            severity: Severity::Low,
            description: format!(
                "{} of {} answers given in under {} ms",
                rushed,
                times.len(),
                RUSHED_RESPONSE_MS
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::questionnaire::{AspectType, Phase, Question};
    use crate::domain::scoring::fixtures;

    fn scores(value: f64) -> MaturityScores {
        MaturityScores {
            personal: value,
            relationship: value,
        }
    }

    fn tagged(id: &str, level: u8, indicators: &[Indicator]) -> Question {
        fixtures::question(id, Phase::CoreDiagnostic, AspectType::Combined, level, indicators)
    }

    mod report {
        use super::*;

        #[test]
        fn clean_profile_reports_nothing() {
            let questions = fixtures::uniform(12, 8, &[Indicator::Trust]);
            let report =
                ContradictionDetector::detect(&fixtures::answers(&questions), &scores(8.0), 0.9);
            assert!(!report.detected);
            assert_eq!(report.severity, Severity::Low);
            assert_eq!(report.effective_severity(), None);
        }

        #[test]
        fn more_than_three_low_flags_escalate_to_medium() {
            let flag = |kind| ContradictionFlag {
                kind,
                severity: Severity::Low,
                description: String::new(),
            };
            let report = ContradictionReport::from_flags(vec![
                flag(ContradictionKind::ControlAsBoundaries),
                flag(ContradictionKind::RushedResponding),
                flag(ContradictionKind::ControlAsBoundaries),
                flag(ContradictionKind::RushedResponding),
            ]);
            assert_eq!(report.severity, Severity::Medium);

            let report = ContradictionReport::from_flags(vec![flag(
                ContradictionKind::RushedResponding,
            )]);
            assert!(report.detected);
            assert_eq!(report.severity, Severity::Low);
        }
    }

    mod compensated_trauma {
        use super::*;

        fn traumatized() -> Vec<Question> {
            vec![
                tagged("a", 11, &[Indicator::AcuteTrauma]),
                tagged("b", 11, &[Indicator::Shame]),
                tagged("c", 10, &[Indicator::Hypervigilance]),
                tagged("d", 10, &[Indicator::Dissociation]),
            ]
        }

        #[test]
        fn fires_with_high_scores_and_low_consistency() {
            let questions = traumatized();
            let report =
                ContradictionDetector::detect(&fixtures::answers(&questions), &scores(9.5), 0.4);
            assert!(report
                .flags
                .iter()
                .any(|f| f.kind == ContradictionKind::CompensatedTrauma));
            assert_eq!(report.severity, Severity::High);
        }

        #[test]
        fn consistent_profiles_are_not_flagged() {
            let questions = traumatized();
            let report =
                ContradictionDetector::detect(&fixtures::answers(&questions), &scores(9.5), 0.6);
            assert!(!report
                .flags
                .iter()
                .any(|f| f.kind == ContradictionKind::CompensatedTrauma));
        }

        #[test]
        fn repeated_trauma_indicator_counts_once() {
            let questions: Vec<Question> = (0..4)
                .map(|i| tagged(&format!("q{i}"), 11, &[Indicator::Shame]))
                .collect();
            let report =
                ContradictionDetector::detect(&fixtures::answers(&questions), &scores(9.5), 0.1);
            assert!(!report
                .flags
                .iter()
                .any(|f| f.kind == ContradictionKind::CompensatedTrauma));
        }
    }

    mod control_as_boundaries {
        use super::*;

        fn profile(control: usize) -> Vec<Question> {
            let mut questions: Vec<Question> = (0..control)
                .map(|i| tagged(&format!("c{i}"), 7, &[Indicator::Rigidity]))
                .collect();
            questions.push(tagged("b0", 8, &[Indicator::HealthyBoundaries]));
            questions.push(tagged("b1", 8, &[Indicator::SelfRespect]));
            questions
        }

        #[test]
        fn four_control_indicators_are_low() {
            let questions = profile(4);
            let report =
                ContradictionDetector::detect(&fixtures::answers(&questions), &scores(7.0), 0.8);
            assert_eq!(report.flags.len(), 1);
            assert_eq!(report.flags[0].kind, ContradictionKind::ControlAsBoundaries);
            assert_eq!(report.severity, Severity::Low);
        }

        #[test]
        fn six_control_indicators_are_medium() {
            let questions = profile(6);
            let report =
                ContradictionDetector::detect(&fixtures::answers(&questions), &scores(7.0), 0.8);
            assert_eq!(report.severity, Severity::Medium);
        }

        #[test]
        fn three_control_indicators_are_ignored() {
            let questions = profile(3);
            let report =
                ContradictionDetector::detect(&fixtures::answers(&questions), &scores(7.0), 0.8);
            assert!(!report.detected);
        }
    }

    mod social_desirability_with_trauma {
        use super::*;

        #[test]
        fn mostly_perfect_answers_with_trauma_are_high() {
            // 7 of 10 answers at level >= 11, 5 trauma indicators.
            let mut questions: Vec<Question> = (0..5)
                .map(|i| tagged(&format!("t{i}"), 12, &[Indicator::TraumaBonding]))
                .collect();
            questions.extend((0..2).map(|i| tagged(&format!("p{i}"), 11, &[])));
            questions.extend((0..3).map(|i| tagged(&format!("m{i}"), 7, &[])));

            let report =
                ContradictionDetector::detect(&fixtures::answers(&questions), &scores(10.0), 0.8);
            assert!(report.detected);
            assert_eq!(report.severity, Severity::High);
        }

        #[test]
        fn uniformly_high_answers_with_some_trauma_are_medium() {
            // All at level 10: perfect ratio 0, high ratio 1.0, 4 trauma indicators.
            let mut questions: Vec<Question> = (0..4)
                .map(|i| tagged(&format!("t{i}"), 10, &[Indicator::AbandonmentFear]))
                .collect();
            questions.extend((0..6).map(|i| tagged(&format!("h{i}"), 10, &[])));

            let report =
                ContradictionDetector::detect(&fixtures::answers(&questions), &scores(10.0), 0.9);
            assert_eq!(report.flags.len(), 1);
            assert_eq!(report.severity, Severity::Medium);
        }
    }

    mod rushed_responding {
        use super::*;

        #[test]
        fn many_fast_answers_are_flagged_low() {
            let questions = fixtures::uniform(10, 7, &[]);
            let answers: Vec<_> = fixtures::answers(&questions)
                .into_iter()
                .enumerate()
                .map(|(i, a)| a.timed(if i < 4 { 900 } else { 6000 }))
                .collect();
            let report = ContradictionDetector::detect(&answers, &scores(7.0), 0.9);
            assert_eq!(report.flags.len(), 1);
            assert_eq!(report.flags[0].kind, ContradictionKind::RushedResponding);
            assert_eq!(report.severity, Severity::Low);
        }

        #[test]
        fn untimed_answers_are_not_judged() {
            let questions = fixtures::uniform(12, 7, &[]);
            let answers: Vec<_> = fixtures::answers(&questions)
                .into_iter()
                .take(9)
                .map(|a| a.timed(100))
                .collect();
            let report = ContradictionDetector::detect(&answers, &scores(7.0), 0.9);
            assert!(!report.detected);
        }
    }
}
