//! Questionnaire module - the immutable question bank.
//!
//! Questions, answer options and their semantic tags (zone, level,
//! indicators), plus the bank that selects eligible questions and resolves
//! option ids. Everything here is read-only after construction and can be
//! shared across sessions.

mod bank;
mod indicator;
mod phase;
mod question;
mod zone;

pub use bank::{LookupError, QuestionBank, QuestionBankError};
pub use indicator::{Indicator, Polarity};
pub use phase::Phase;
pub use question::{
    AnswerOption, AspectType, Category, Question, QuestionText, RelationshipContext,
    RelationshipStatus,
};
pub use zone::{Zone, ZoneBand, SCALE_MAX, SCALE_MIDPOINT, SCALE_MIN};
