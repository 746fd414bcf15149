//! HTTP DTOs for assessment endpoints.
//!
//! Questions are sent without option levels, zones or indicators so the
//! respondent cannot see how answers are scored.

use serde::{Deserialize, Serialize};

use crate::domain::assessment::{Progress, SessionState};
use crate::domain::foundation::DomainError;
use crate::domain::questionnaire::{
    AspectType, Category, Phase, Question, RelationshipStatus,
};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to start an assessment.
///
/// The identity provider may supply its own session id; otherwise one is
/// generated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartAssessmentRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Request to record an answer.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAnswerRequest {
    pub question_id: String,
    pub option_id: String,
    #[serde(default)]
    pub response_time_ms: Option<u64>,
}

/// Request to undo the most recent answers.
#[derive(Debug, Clone, Deserialize)]
pub struct GoBackRequest {
    #[serde(default = "default_steps")]
    pub steps: usize,
}

impl Default for GoBackRequest {
    fn default() -> Self {
        Self {
            steps: default_steps(),
        }
    }
}

fn default_steps() -> usize {
    1
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// A selectable answer as shown to the respondent.
#[derive(Debug, Clone, Serialize)]
pub struct OptionResponse {
    pub id: String,
    pub text: String,
}

/// A question as shown to the respondent.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionResponse {
    pub id: String,
    pub text: String,
    pub category: Category,
    pub phase: Phase,
    pub aspect_type: AspectType,
    pub options: Vec<OptionResponse>,
}

impl QuestionResponse {
    /// Renders the question text for the respondent's declared status.
    pub fn render(question: &Question, status: Option<RelationshipStatus>) -> Self {
        Self {
            id: question.id.clone(),
            text: question.text_for(status).to_string(),
            category: question.category,
            phase: question.phase,
            aspect_type: question.aspect_type,
            options: question
                .options
                .iter()
                .map(|option| OptionResponse {
                    id: option.id.clone(),
                    text: option.text.clone(),
                })
                .collect(),
        }
    }
}

/// Where a session stands and what to ask next.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentStateResponse {
    pub session_id: String,
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship_status: Option<RelationshipStatus>,
    pub question: Option<QuestionResponse>,
    pub progress: Progress,
}

impl AssessmentStateResponse {
    pub fn new(
        state: &SessionState,
        question: Option<&Question>,
        progress: Progress,
    ) -> Self {
        let status = state.relationship_status();
        Self {
            session_id: state.session_id().to_string(),
            complete: question.is_none(),
            relationship_status: status,
            question: question.map(|q| QuestionResponse::render(q, status)),
            progress,
        }
    }
}

/// Liveness probe response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub questions: usize,
}

/// Error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&DomainError> for ErrorResponse {
    fn from(error: &DomainError) -> Self {
        let details = (!error.details.is_empty())
            .then(|| serde_json::to_value(&error.details).ok())
            .flatten();
        Self {
            code: error.code.to_string(),
            message: error.message.clone(),
            details,
        }
    }
}
