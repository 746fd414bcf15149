//! HTTP adapter for assessment endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    AssessmentStateResponse, ErrorResponse, GoBackRequest, HealthResponse, OptionResponse,
    QuestionResponse, StartAssessmentRequest, SubmitAnswerRequest,
};
pub use handlers::{AssessmentHandlers, DEFAULT_RESULT_CAPACITY};
pub use routes::{assessment_routes, health_routes};
