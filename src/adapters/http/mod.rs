//! HTTP adapters - REST API implementations.
//!
//! [`api_router`] assembles every endpoint; the binary adds the tower
//! middleware stack around it.

pub mod assessment;

pub use assessment::{assessment_routes, health_routes, AssessmentHandlers};

use axum::Router;

/// Creates the application router.
pub fn api_router(handlers: AssessmentHandlers) -> Router {
    Router::new()
        .merge(health_routes(handlers.clone()))
        .nest("/assessments", assessment_routes(handlers))
}
