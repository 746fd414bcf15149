//! Gap Analyzer - classifies the split between personal and relationship maturity.

use serde::{Deserialize, Serialize};

use super::round_to;

/// Gaps below this are considered balanced.
pub const BALANCED_GAP: f64 = 1.5;

/// Which score is ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapDirection {
    Balanced,
    PersonalHigher,
    RelationshipHigher,
}

/// Size of the gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapSeverity {
    Minimal,
    Moderate,
    Significant,
    Critical,
}

impl GapSeverity {
    pub fn from_gap(gap: f64) -> Self {
        if gap < BALANCED_GAP {
            GapSeverity::Minimal
        } else if gap < 2.5 {
            GapSeverity::Moderate
        } else if gap < 4.0 {
            GapSeverity::Significant
        } else {
            GapSeverity::Critical
        }
    }
}

/// Fixed qualitative reading of one (direction, severity) pair.
#[derive(Debug)]
struct GapProfile {
    pattern: &'static str,
    recommendations: &'static [&'static str],
}

const BALANCED: GapProfile = GapProfile {
    pattern: "Integrated growth: how you relate to yourself and how you relate to others develop together.",
    recommendations: &[
        "Keep reinforcing the practices that already support both areas.",
        "Use your balance as a base to work on the lowest-scoring category.",
    ],
};

const PERSONAL_MODERATE: GapProfile = GapProfile {
    pattern: "Inner insight slightly ahead of relational practice.",
    recommendations: &[
        "Translate self-knowledge into concrete conversations with your partner or close people.",
        "Practice stating needs out loud instead of resolving them internally.",
    ],
};

const PERSONAL_SIGNIFICANT: GapProfile = GapProfile {
    pattern: "Protected self-sufficiency: personal growth is used to keep relationships at a distance.",
    recommendations: &[
        "Notice where independence turns into avoidance of closeness.",
        "Share one vulnerable experience per week with someone you trust.",
        "Consider couples or relational coaching to practice connection safely.",
    ],
};

const PERSONAL_CRITICAL: GapProfile = GapProfile {
    pattern: "Split functioning: strong individual maturity that collapses inside intimate relationships.",
    recommendations: &[
        "Work with a therapist on attachment patterns that activate only in close relationships.",
        "Identify the specific relational triggers that undo your personal stability.",
        "Pause major relationship decisions until the pattern is understood.",
    ],
};

const RELATIONSHIP_MODERATE: GapProfile = GapProfile {
    pattern: "Relational skills slightly ahead of inner work.",
    recommendations: &[
        "Reserve regular time for reflection that does not involve anyone else.",
        "Check whether your relational choices reflect your own values.",
    ],
};

const RELATIONSHIP_SIGNIFICANT: GapProfile = GapProfile {
    pattern: "Borrowed stability: the relationship carries a maturity that is not yet your own.",
    recommendations: &[
        "Build routines for self-regulation that do not depend on a partner.",
        "Explore which needs you expect the relationship to meet for you.",
        "Strengthen friendships and interests outside the relationship.",
    ],
};

const RELATIONSHIP_CRITICAL: GapProfile = GapProfile {
    pattern: "Relational dependency: functioning well mainly through others while personal foundations are fragile.",
    recommendations: &[
        "Seek individual therapy focused on self-worth and emotional regulation.",
        "Map where your identity merges with your partner's and set one boundary there.",
        "Create a support network that does not run through the relationship.",
    ],
};

impl GapProfile {
    /// Total over every pair; a balanced direction or minimal severity
    /// always reads as balanced.
    fn lookup(direction: GapDirection, severity: GapSeverity) -> &'static GapProfile {
        use GapDirection::*;
        use GapSeverity::*;
        match (direction, severity) {
            (Balanced, _) | (_, Minimal) => &BALANCED,
            (PersonalHigher, Moderate) => &PERSONAL_MODERATE,
            (PersonalHigher, Significant) => &PERSONAL_SIGNIFICANT,
            (PersonalHigher, Critical) => &PERSONAL_CRITICAL,
            (RelationshipHigher, Moderate) => &RELATIONSHIP_MODERATE,
            (RelationshipHigher, Significant) => &RELATIONSHIP_SIGNIFICANT,
            (RelationshipHigher, Critical) => &RELATIONSHIP_CRITICAL,
        }
    }
}

/// Result of gap analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapAnalysis {
    pub gap: f64,
    pub direction: GapDirection,
    pub severity: GapSeverity,
    pub pattern: String,
    pub recommendations: Vec<String>,
}

pub struct GapAnalyzer;

impl GapAnalyzer {
    pub fn analyze(personal: f64, relationship: f64) -> GapAnalysis {
        let gap = round_to((personal - relationship).abs(), 1);
        let direction = if gap < BALANCED_GAP {
            GapDirection::Balanced
        } else if personal > relationship {
            GapDirection::PersonalHigher
        } else {
            GapDirection::RelationshipHigher
        };
        let severity = GapSeverity::from_gap(gap);
        let profile = GapProfile::lookup(direction, severity);

        GapAnalysis {
            gap,
            direction,
            severity,
            pattern: profile.pattern.to_string(),
            recommendations: profile
                .recommendations
                .iter()
                .map(|r| r.to_string())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_gaps_are_balanced_and_minimal() {
        let analysis = GapAnalyzer::analyze(7.0, 7.9);
        assert_eq!(analysis.gap, 0.9);
        assert_eq!(analysis.direction, GapDirection::Balanced);
        assert_eq!(analysis.severity, GapSeverity::Minimal);
        assert_eq!(analysis.pattern, BALANCED.pattern);
    }

    #[test]
    fn severity_thresholds() {
        assert_eq!(GapSeverity::from_gap(1.4), GapSeverity::Minimal);
        assert_eq!(GapSeverity::from_gap(1.5), GapSeverity::Moderate);
        assert_eq!(GapSeverity::from_gap(2.5), GapSeverity::Significant);
        assert_eq!(GapSeverity::from_gap(3.9), GapSeverity::Significant);
        assert_eq!(GapSeverity::from_gap(4.0), GapSeverity::Critical);
    }

    #[test]
    fn direction_follows_the_higher_score() {
        assert_eq!(
            GapAnalyzer::analyze(9.0, 6.0).direction,
            GapDirection::PersonalHigher
        );
        assert_eq!(
            GapAnalyzer::analyze(4.0, 9.0).direction,
            GapDirection::RelationshipHigher
        );
    }

    #[test]
    fn lookup_is_total() {
        let directions = [
            GapDirection::Balanced,
            GapDirection::PersonalHigher,
            GapDirection::RelationshipHigher,
        ];
        let severities = [
            GapSeverity::Minimal,
            GapSeverity::Moderate,
            GapSeverity::Significant,
            GapSeverity::Critical,
        ];
        for direction in directions {
            for severity in severities {
                let profile = GapProfile::lookup(direction, severity);
                assert!(!profile.pattern.is_empty());
                assert!(!profile.recommendations.is_empty());
            }
        }
    }

    #[test]
    fn recommendations_grow_with_severity() {
        let moderate = GapAnalyzer::analyze(8.0, 6.0);
        let critical = GapAnalyzer::analyze(11.0, 5.0);
        assert_eq!(moderate.severity, GapSeverity::Moderate);
        assert_eq!(critical.severity, GapSeverity::Critical);
        assert!(critical.recommendations.len() > moderate.recommendations.len());
        assert_ne!(critical.pattern, moderate.pattern);
    }

    #[test]
    fn mirrored_gaps_read_differently() {
        let personal = GapAnalyzer::analyze(10.0, 7.0);
        let relationship = GapAnalyzer::analyze(7.0, 10.0);
        assert_eq!(personal.severity, relationship.severity);
        assert_ne!(personal.pattern, relationship.pattern);
    }
}
