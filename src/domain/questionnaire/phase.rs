//! Questionnaire phases.
//!
//! Phases run in one fixed order and never move backward:
//! `RelationshipStatus` → `Detection` → `CoreDiagnostic` → `Clarification`
//! → `Validation` → `Completed`.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// A phase of the adaptive questionnaire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Declares whether the respondent is in a relationship.
    #[default]
    RelationshipStatus,

    /// Broad questions locating the respondent's zone.
    Detection,

    /// Main scored questions.
    CoreDiagnostic,

    /// Questions targeting the most likely zones.
    Clarification,

    /// Cross-check questions, weighted down.
    Validation,

    /// Terminal; results are available.
    Completed,
}

impl Phase {
    /// All phases in progression order.
    pub const ORDER: [Phase; 6] = [
        Phase::RelationshipStatus,
        Phase::Detection,
        Phase::CoreDiagnostic,
        Phase::Clarification,
        Phase::Validation,
        Phase::Completed,
    ];

    /// Phases that hold questions (everything but `Completed`).
    pub const QUESTION_PHASES: [Phase; 5] = [
        Phase::RelationshipStatus,
        Phase::Detection,
        Phase::CoreDiagnostic,
        Phase::Clarification,
        Phase::Validation,
    ];

    /// The phase that follows this one, or `None` for `Completed`.
    pub fn next(&self) -> Option<Phase> {
        Self::ORDER.get(self.index() + 1).copied()
    }

    /// Zero-based position in the progression.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Display label for UI.
    pub fn label(&self) -> &'static str {
        match self {
            Phase::RelationshipStatus => "Relationship status",
            Phase::Detection => "Detection",
            Phase::CoreDiagnostic => "Core diagnostic",
            Phase::Clarification => "Clarification",
            Phase::Validation => "Validation",
            Phase::Completed => "Completed",
        }
    }

    /// True if answers given in this phase feed the scorer.
    pub fn is_scored(&self) -> bool {
        !matches!(self, Phase::RelationshipStatus | Phase::Completed)
    }
}

impl StateMachine for Phase {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.next() == Some(*target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        self.next().into_iter().collect()
    }
}
