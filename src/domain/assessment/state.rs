//! Session state - the only mutable entity of the engine.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::AssessmentError;
use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::questionnaire::{Phase, RelationshipStatus};
use crate::domain::scoring::ZoneConfidence;

/// Current snapshot format.
pub const SNAPSHOT_VERSION: u32 = 1;

/// One recorded answer. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: String,
    pub selected_option_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
}

impl Answer {
    pub fn new(question_id: impl Into<String>, selected_option_id: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
            selected_option_id: selected_option_id.into(),
            response_time_ms: None,
        }
    }

    pub fn timed(mut self, response_time_ms: u64) -> Self {
        self.response_time_ms = Some(response_time_ms);
        self
    }
}

/// Progress of one respondent through the questionnaire.
///
/// Fields are read-only from outside the assessment module; the engine
/// functions are the only writers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    session_id: SessionId,
    phase: Phase,
    answers: Vec<Answer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    relationship_status: Option<RelationshipStatus>,
    zone_confidence: ZoneConfidence,
    started_at: Timestamp,
}

impl SessionState {
    pub(super) fn new(session_id: SessionId, started_at: Timestamp) -> Self {
        Self {
            session_id,
            phase: Phase::default(),
            answers: Vec::new(),
            relationship_status: None,
            zone_confidence: ZoneConfidence::undetermined(),
            started_at,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn relationship_status(&self) -> Option<RelationshipStatus> {
        self.relationship_status
    }

    pub fn zone_confidence(&self) -> &ZoneConfidence {
        &self.zone_confidence
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub fn answer_count(&self) -> usize {
        self.answers.len()
    }

    /// Ids of every answered question.
    pub fn answered_ids(&self) -> HashSet<&str> {
        self.answers
            .iter()
            .map(|answer| answer.question_id.as_str())
            .collect()
    }

    pub fn has_answered(&self, question_id: &str) -> bool {
        self.answers
            .iter()
            .any(|answer| answer.question_id == question_id)
    }

    pub(super) fn push_answer(&mut self, answer: Answer) {
        self.answers.push(answer);
    }

    pub(super) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(super) fn set_relationship_status(&mut self, status: RelationshipStatus) {
        self.relationship_status = Some(status);
    }

    pub(super) fn set_zone_confidence(&mut self, zone_confidence: ZoneConfidence) {
        self.zone_confidence = zone_confidence;
    }

    fn first_duplicate(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.answers
            .iter()
            .map(|answer| answer.question_id.as_str())
            .find(|id| !seen.insert(*id))
    }
}

/// Versioned, serializable copy of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub version: u32,
    pub state: SessionState,
}

/// Captures the state for persistence.
pub fn serialize(state: &SessionState) -> SessionSnapshot {
    SessionSnapshot {
        version: SNAPSHOT_VERSION,
        state: state.clone(),
    }
}

/// Rebuilds a state from a snapshot, reproducing it exactly.
pub fn restore(snapshot: SessionSnapshot) -> Result<SessionState, AssessmentError> {
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(AssessmentError::invalid_snapshot(format!(
            "unsupported version {}, expected {}",
            snapshot.version, SNAPSHOT_VERSION
        )));
    }
    if let Some(question_id) = snapshot.state.first_duplicate() {
        return Err(AssessmentError::invalid_snapshot(format!(
            "question '{}' answered more than once",
            question_id
        )));
    }
    Ok(snapshot.state)
}
