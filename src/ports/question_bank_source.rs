//! QuestionBankSource port - content-authoring collaborator.
//!
//! The bank is loaded once at process start and never mutated, so this port
//! is synchronous.

use thiserror::Error;

use crate::domain::questionnaire::{QuestionBank, QuestionBankError};

/// Errors raised while loading authored question content.
#[derive(Debug, Error)]
pub enum QuestionSourceError {
    #[error("Failed to read question bank from {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Question bank is not valid YAML: {0}")]
    Parse(String),

    #[error("Question bank is inconsistent: {0}")]
    Invalid(#[from] QuestionBankError),
}

/// Supplies the immutable question bank.
pub trait QuestionBankSource: Send + Sync {
    /// Loads and validates the bank.
    fn load(&self) -> Result<QuestionBank, QuestionSourceError>;

    /// Human-readable description of where the content comes from.
    fn describe(&self) -> String;
}
