//! Phase engine - the core API over an explicit [`SessionState`].
//!
//! Free functions instead of an engine object: the bank is shared and
//! read-only, the state belongs to exactly one respondent, and every call
//! completes synchronously.

use serde::{Deserialize, Serialize};

use super::{Answer, AssessmentError, SessionState};
use crate::domain::foundation::{SessionId, StateMachine, Timestamp};
use crate::domain::questionnaire::{Phase, Question, QuestionBank};
use crate::domain::scoring::{zone_confidence, AssessmentResult, ResultAggregator, ScoredAnswer};

/// Starts a new session, passing through any phase without questions.
pub fn start(bank: &QuestionBank, session_id: SessionId) -> SessionState {
    let mut state = SessionState::new(session_id, Timestamp::now());
    settle(bank, &mut state);
    state
}

/// Next question to present, or `None` once complete.
///
/// Outside clarification this is the first eligible question in bank order.
/// Clarification walks zones by descending confidence and picks the first
/// eligible question targeting each, falling back to bank order.
pub fn next_question<'b>(bank: &'b QuestionBank, state: &SessionState) -> Option<&'b Question> {
    let phase = state.phase();
    if phase == Phase::Completed {
        return None;
    }
    let answered = state.answered_ids();
    let status = state.relationship_status();

    if phase == Phase::Clarification {
        let targeted = state.zone_confidence().ranked().into_iter().find_map(|zone| {
            bank.questions().iter().find(|question| {
                question.targets(zone) && question.is_eligible(phase, &answered, status)
            })
        });
        if targeted.is_some() {
            return targeted;
        }
    }
    bank.next_eligible_question(phase, &answered, status)
}

/// Records an answer and advances the phase if the current one is exhausted.
///
/// Fails without touching the state when the question or option is unknown
/// or the question was already answered.
pub fn process_answer(
    bank: &QuestionBank,
    state: &mut SessionState,
    question_id: &str,
    selected_option_id: &str,
    response_time_ms: Option<u64>,
) -> Result<(), AssessmentError> {
    let (question, option) = bank
        .resolve_answer(question_id, selected_option_id)
        .map_err(|err| {
            tracing::warn!(
                session_id = %state.session_id(),
                question_id,
                option_id = selected_option_id,
                "rejected answer: {}",
                err
            );
            AssessmentError::from(err)
        })?;
    if state.has_answered(question_id) {
        tracing::warn!(
            session_id = %state.session_id(),
            question_id,
            "rejected duplicate answer"
        );
        return Err(AssessmentError::duplicate_answer(question_id));
    }

    let mut answer = Answer::new(question_id, selected_option_id);
    answer.response_time_ms = response_time_ms;
    state.push_answer(answer);

    if question.phase == Phase::RelationshipStatus {
        if let Some(status) = option.status {
            state.set_relationship_status(status);
        }
    }
    refresh_zone_confidence(bank, state);
    settle(bank, state);
    Ok(())
}

/// True once the questionnaire reached its terminal phase.
pub fn is_complete(state: &SessionState) -> bool {
    state.phase().is_terminal()
}

/// Computes the result without caching.
pub fn compute_results(
    bank: &QuestionBank,
    state: &SessionState,
    aggregator: &ResultAggregator,
) -> Result<AssessmentResult, AssessmentError> {
    if !is_complete(state) {
        return Err(AssessmentError::TestNotComplete);
    }
    let answers = scored_answers(bank, state)?;
    let result = aggregator.aggregate(&answers, state.zone_confidence().clone());
    tracing::info!(
        session_id = %state.session_id(),
        answers = answers.len(),
        zone = %result.detected_zone.label(),
        personal = result.personal_maturity,
        relationship = result.relationship_maturity,
        "assessment completed"
    );
    Ok(result)
}

/// Answers resolved against the bank, skipping unscored status answers.
pub fn scored_answers<'b>(
    bank: &'b QuestionBank,
    state: &SessionState,
) -> Result<Vec<ScoredAnswer<'b>>, AssessmentError> {
    let mut scored = Vec::with_capacity(state.answer_count());
    for answer in state.answers() {
        let (question, option) =
            bank.resolve_answer(&answer.question_id, &answer.selected_option_id)?;
        if !question.phase.is_scored() {
            continue;
        }
        let mut resolved = ScoredAnswer::new(question, option);
        resolved.response_time_ms = answer.response_time_ms;
        scored.push(resolved);
    }
    Ok(scored)
}

/// Returns a fresh state with the last `steps` answers removed.
///
/// The remaining answers are replayed from the start, so the phase is
/// recomputed instead of being moved backward.
pub fn rewind(
    bank: &QuestionBank,
    state: &SessionState,
    steps: usize,
) -> Result<SessionState, AssessmentError> {
    let keep = state.answer_count().saturating_sub(steps);
    let mut replayed = SessionState::new(state.session_id().clone(), state.started_at());
    settle(bank, &mut replayed);
    for answer in &state.answers()[..keep] {
        process_answer(
            bank,
            &mut replayed,
            &answer.question_id,
            &answer.selected_option_id,
            answer.response_time_ms,
        )?;
    }
    tracing::debug!(
        session_id = %state.session_id(),
        removed = state.answer_count() - keep,
        phase = replayed.phase().label(),
        "rewound session"
    );
    Ok(replayed)
}

/// How far a session has come.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub answered: usize,
    pub phase: Phase,
    /// 0-based index among the five question phases; 5 once complete.
    pub phase_index: usize,
    pub phase_count: usize,
    /// Eligible questions left in the current and later phases.
    pub remaining: usize,
}

pub fn progress(bank: &QuestionBank, state: &SessionState) -> Progress {
    let answered = state.answered_ids();
    let status = state.relationship_status();
    let remaining = Phase::QUESTION_PHASES
        .iter()
        .filter(|phase| **phase >= state.phase())
        .map(|phase| bank.eligible(*phase, &answered, status).count())
        .sum();

    Progress {
        answered: state.answer_count(),
        phase: state.phase(),
        phase_index: state.phase().index(),
        phase_count: Phase::QUESTION_PHASES.len(),
        remaining,
    }
}

fn refresh_zone_confidence(bank: &QuestionBank, state: &mut SessionState) {
    let zones: Vec<_> = state
        .answers()
        .iter()
        .filter_map(|answer| bank.resolve_option(&answer.selected_option_id).ok())
        .map(|option| option.zone)
        .collect();
    state.set_zone_confidence(zone_confidence(zones));
}

/// Advances through every phase that has no eligible question left.
fn settle(bank: &QuestionBank, state: &mut SessionState) {
    while !state.phase().is_terminal() && next_question(bank, state).is_none() {
        let Some(next) = state.phase().next() else {
            break;
        };
        tracing::debug!(
            session_id = %state.session_id(),
            from = state.phase().label(),
            to = next.label(),
            "phase transition"
        );
        state.set_phase(next);
    }
}
