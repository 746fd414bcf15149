//! HTTP routes for assessment endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{
    current_question, delete_assessment, get_assessment_results, get_progress, go_back, health,
    start_assessment, submit_answer, AssessmentHandlers,
};

/// Creates the assessment router, to be nested under `/assessments`.
pub fn assessment_routes(handlers: AssessmentHandlers) -> Router {
    Router::new()
        .route("/", post(start_assessment))
        .route("/:id", delete(delete_assessment))
        .route("/:id/question", get(current_question))
        .route("/:id/answers", post(submit_answer))
        .route("/:id/back", post(go_back))
        .route("/:id/progress", get(get_progress))
        .route("/:id/results", get(get_assessment_results))
        .with_state(handlers)
}

/// Creates the health check router.
pub fn health_routes(handlers: AssessmentHandlers) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(handlers)
}
