//! Indicator tags carried by answer options.
//!
//! Indicators are a closed vocabulary. Scoring and the detectors test
//! membership in fixed families instead of matching keywords in free text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How an indicator moves an option's adjusted level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    /// +0.5, net keyword adjustment clamped to ±1.
    Positive,
    /// -0.5, net keyword adjustment clamped to ±1.
    Negative,
    /// +0.75 each, capped at +1.5; lifts the zone clamp.
    ExtremePositive,
    /// -0.75 each, capped at -1.5; lifts the zone clamp.
    ExtremeNegative,
}

/// Semantic tag attached to an answer option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    // Positive
    SecureAttachment,
    EmotionalRegulation,
    OpenCommunication,
    Empathy,
    SelfAwareness,
    HealthyBoundaries,
    Accountability,
    Trust,
    Autonomy,
    Reciprocity,
    ConflictRepair,
    Vulnerability,
    Assertiveness,
    SelfRespect,
    Acceptance,
    Gratitude,

    // Negative
    AnxiousAttachment,
    AvoidantAttachment,
    Codependency,
    Defensiveness,
    Stonewalling,
    Jealousy,
    Withdrawal,
    Blame,
    PeoplePleasing,
    EmotionalReactivity,
    Rigidity,
    Possessiveness,
    Surveillance,
    Ultimatums,
    AbandonmentFear,
    Hypervigilance,
    Shame,
    EmotionalNumbing,
    TraumaBonding,
    Idealization,

    // Extreme positive
    Transcendence,
    SpiritualMastery,
    UnconditionalPresence,
    NonDualAwareness,

    // Extreme negative
    AcuteTrauma,
    Abuse,
    CoerciveControl,
    SelfHarm,
    Dissociation,
}

impl Indicator {
    /// Every indicator, in declaration order.
    pub const ALL: [Indicator; 45] = [
        Indicator::SecureAttachment,
        Indicator::EmotionalRegulation,
        Indicator::OpenCommunication,
        Indicator::Empathy,
        Indicator::SelfAwareness,
        Indicator::HealthyBoundaries,
        Indicator::Accountability,
        Indicator::Trust,
        Indicator::Autonomy,
        Indicator::Reciprocity,
        Indicator::ConflictRepair,
        Indicator::Vulnerability,
        Indicator::Assertiveness,
        Indicator::SelfRespect,
        Indicator::Acceptance,
        Indicator::Gratitude,
        Indicator::AnxiousAttachment,
        Indicator::AvoidantAttachment,
        Indicator::Codependency,
        Indicator::Defensiveness,
        Indicator::Stonewalling,
        Indicator::Jealousy,
        Indicator::Withdrawal,
        Indicator::Blame,
        Indicator::PeoplePleasing,
        Indicator::EmotionalReactivity,
        Indicator::Rigidity,
        Indicator::Possessiveness,
        Indicator::Surveillance,
        Indicator::Ultimatums,
        Indicator::AbandonmentFear,
        Indicator::Hypervigilance,
        Indicator::Shame,
        Indicator::EmotionalNumbing,
        Indicator::TraumaBonding,
        Indicator::Idealization,
        Indicator::Transcendence,
        Indicator::SpiritualMastery,
        Indicator::UnconditionalPresence,
        Indicator::NonDualAwareness,
        Indicator::AcuteTrauma,
        Indicator::Abuse,
        Indicator::CoerciveControl,
        Indicator::SelfHarm,
        Indicator::Dissociation,
    ];

    /// Scoring polarity of this indicator.
    pub fn polarity(&self) -> Polarity {
        use Indicator::*;
        match self {
            SecureAttachment | EmotionalRegulation | OpenCommunication | Empathy
            | SelfAwareness | HealthyBoundaries | Accountability | Trust | Autonomy
            | Reciprocity | ConflictRepair | Vulnerability | Assertiveness | SelfRespect
            | Acceptance | Gratitude => Polarity::Positive,

            AnxiousAttachment | AvoidantAttachment | Codependency | Defensiveness
            | Stonewalling | Jealousy | Withdrawal | Blame | PeoplePleasing
            | EmotionalReactivity | Rigidity | Possessiveness | Surveillance | Ultimatums
            | AbandonmentFear | Hypervigilance | Shame | EmotionalNumbing | TraumaBonding
            | Idealization => Polarity::Negative,

            Transcendence | SpiritualMastery | UnconditionalPresence | NonDualAwareness => {
                Polarity::ExtremePositive
            }

            AcuteTrauma | Abuse | CoerciveControl | SelfHarm | Dissociation => {
                Polarity::ExtremeNegative
            }
        }
    }

    /// True for extreme indicators of either sign.
    pub fn is_extreme(&self) -> bool {
        matches!(
            self.polarity(),
            Polarity::ExtremePositive | Polarity::ExtremeNegative
        )
    }

    /// Trauma family, counted by the contradiction detector.
    pub fn is_trauma(&self) -> bool {
        use Indicator::*;
        matches!(
            self,
            AcuteTrauma
                | Abuse
                | SelfHarm
                | Dissociation
                | TraumaBonding
                | AbandonmentFear
                | Hypervigilance
                | Shame
                | EmotionalNumbing
        )
    }

    /// Control and rigidity family.
    pub fn is_control(&self) -> bool {
        use Indicator::*;
        matches!(
            self,
            CoerciveControl | Rigidity | Possessiveness | Surveillance | Ultimatums
        )
    }

    /// Healthy-boundaries family.
    pub fn is_healthy_boundary(&self) -> bool {
        matches!(
            self,
            Indicator::HealthyBoundaries | Indicator::Assertiveness | Indicator::SelfRespect
        )
    }

    /// Extreme-high family used as qualitative corroboration of high scores.
    pub fn is_extreme_high(&self) -> bool {
        self.polarity() == Polarity::ExtremePositive
    }

    /// Stable snake_case name, identical to the serialized form.
    pub fn name(&self) -> String {
        serde_json::to_value(self)
            .ok()
            .and_then(|value| value.as_str().map(str::to_owned))
            .unwrap_or_else(|| format!("{:?}", self))
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn all_lists_every_indicator_once() {
        let unique: HashSet<Indicator> = Indicator::ALL.iter().copied().collect();
        assert_eq!(unique.len(), Indicator::ALL.len());
    }

    #[test]
    fn extreme_indicators_have_extreme_polarity() {
        assert_eq!(Indicator::Transcendence.polarity(), Polarity::ExtremePositive);
        assert_eq!(Indicator::AcuteTrauma.polarity(), Polarity::ExtremeNegative);
        assert!(Indicator::CoerciveControl.is_extreme());
        assert!(!Indicator::Trust.is_extreme());
    }

    #[test]
    fn families_are_explicit_sets() {
        let trauma: Vec<_> = Indicator::ALL.iter().filter(|i| i.is_trauma()).collect();
        assert_eq!(trauma.len(), 9);

        let control: Vec<_> = Indicator::ALL.iter().filter(|i| i.is_control()).collect();
        assert_eq!(control.len(), 5);

        let boundaries: Vec<_> = Indicator::ALL
            .iter()
            .filter(|i| i.is_healthy_boundary())
            .collect();
        assert_eq!(boundaries.len(), 3);
    }

    #[test]
    fn similar_names_do_not_collide() {
        // "healthy_boundaries" must not count as a control indicator just
        // because both talk about limits.
        assert!(!Indicator::HealthyBoundaries.is_control());
        assert!(!Indicator::Rigidity.is_healthy_boundary());
    }

    #[test]
    fn extreme_high_matches_extreme_positive() {
        for indicator in Indicator::ALL {
            assert_eq!(
                indicator.is_extreme_high(),
                indicator.polarity() == Polarity::ExtremePositive
            );
        }
    }

    #[test]
    fn name_matches_serialized_form() {
        assert_eq!(Indicator::NonDualAwareness.name(), "non_dual_awareness");
        let parsed: Indicator = serde_json::from_str("\"trauma_bonding\"").unwrap();
        assert_eq!(parsed, Indicator::TraumaBonding);
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert!(serde_json::from_str::<Indicator>("\"mostly_fine\"").is_err());
    }
}
