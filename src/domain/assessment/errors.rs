//! Assessment-specific error types.
//!
//! Every error is a local validation failure raised at the offending call.
//! Nothing here is transient, so none of them are retryable.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | UnknownQuestion | 404 |
//! | UnknownOption | 422 |
//! | DuplicateAnswer | 409 |
//! | TestNotComplete | 409 |
//! | InvalidSnapshot | 500 |

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::questionnaire::LookupError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssessmentError {
    /// The question id is not in the bank.
    #[error("Unknown question: {0}")]
    UnknownQuestion(String),

    /// The option does not belong to the question.
    #[error("Unknown option '{option_id}' for question '{question_id}'")]
    UnknownOption {
        question_id: String,
        option_id: String,
    },

    /// The question was already answered in this session.
    #[error("Question '{0}' has already been answered")]
    DuplicateAnswer(String),

    /// Results were requested before the last phase finished.
    #[error("The assessment is not complete yet")]
    TestNotComplete,

    /// A snapshot could not be restored.
    #[error("Invalid session snapshot: {0}")]
    InvalidSnapshot(String),
}

impl AssessmentError {
    pub fn duplicate_answer(question_id: impl Into<String>) -> Self {
        AssessmentError::DuplicateAnswer(question_id.into())
    }

    pub fn invalid_snapshot(reason: impl Into<String>) -> Self {
        AssessmentError::InvalidSnapshot(reason.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            AssessmentError::UnknownQuestion(_) => ErrorCode::UnknownQuestion,
            AssessmentError::UnknownOption { .. } => ErrorCode::UnknownOption,
            AssessmentError::DuplicateAnswer(_) => ErrorCode::DuplicateAnswer,
            AssessmentError::TestNotComplete => ErrorCode::TestNotComplete,
            AssessmentError::InvalidSnapshot(_) => ErrorCode::InvalidSnapshot,
        }
    }
}

impl From<LookupError> for AssessmentError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::UnknownQuestion(id) => AssessmentError::UnknownQuestion(id),
            LookupError::UnknownOption {
                question_id,
                option_id,
            } => AssessmentError::UnknownOption {
                question_id,
                option_id,
            },
        }
    }
}

impl From<AssessmentError> for DomainError {
    fn from(err: AssessmentError) -> Self {
        let domain = DomainError::new(err.code(), err.to_string());
        match err {
            AssessmentError::UnknownQuestion(question_id)
            | AssessmentError::DuplicateAnswer(question_id) => {
                domain.with_detail("question_id", question_id)
            }
            AssessmentError::UnknownOption {
                question_id,
                option_id,
            } => domain
                .with_detail("question_id", question_id)
                .with_detail("option_id", option_id),
            AssessmentError::TestNotComplete | AssessmentError::InvalidSnapshot(_) => domain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_errors_convert() {
        let err: AssessmentError = LookupError::UnknownQuestion("q9".into()).into();
        assert_eq!(err, AssessmentError::UnknownQuestion("q9".into()));

        let err: AssessmentError = LookupError::UnknownOption {
            question_id: "q1".into(),
            option_id: "zz".into(),
        }
        .into();
        assert_eq!(err.code(), ErrorCode::UnknownOption);
    }

    #[test]
    fn codes_map_to_http_statuses() {
        assert_eq!(AssessmentError::UnknownQuestion("q".into()).code().http_status(), 404);
        assert_eq!(
            AssessmentError::UnknownOption {
                question_id: "q".into(),
                option_id: "o".into()
            }
            .code()
            .http_status(),
            422
        );
        assert_eq!(AssessmentError::duplicate_answer("q").code().http_status(), 409);
        assert_eq!(AssessmentError::TestNotComplete.code().http_status(), 409);
    }

    #[test]
    fn domain_error_carries_details() {
        let domain: DomainError = AssessmentError::UnknownOption {
            question_id: "core_trust".into(),
            option_id: "x".into(),
        }
        .into();
        assert_eq!(domain.code, ErrorCode::UnknownOption);
        assert_eq!(domain.details.get("option_id"), Some(&"x".to_string()));
    }

    #[test]
    fn messages_are_readable() {
        assert_eq!(
            AssessmentError::duplicate_answer("core_trust").to_string(),
            "Question 'core_trust' has already been answered"
        );
    }
}
