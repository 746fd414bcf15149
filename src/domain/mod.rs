//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `questionnaire` - Zones, indicators, questions and the question bank
//! - `assessment` - Session state, the phase engine and the core API
//! - `scoring` - Pure services turning answers into results

pub mod assessment;
pub mod foundation;
pub mod questionnaire;
pub mod scoring;
