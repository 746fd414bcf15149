//! Assessment module - one respondent's session and the core API.
//!
//! # Operations
//!
//! - [`start`] / [`next_question`] / [`process_answer`] drive the phase engine
//! - [`is_complete`] / [`get_results`] / [`compute_results`] produce results
//! - [`serialize`] / [`restore`] convert to and from [`SessionSnapshot`]
//! - [`rewind`] replays all but the last answers; [`progress`] reports position
//!
//! `SessionState` is an explicit value. Several sessions may live in one
//! process; a single session must only be driven by one caller at a time.

mod cache;
mod engine;
mod errors;
mod state;

pub use cache::{get_results, CacheKey, ResultCache};
pub use engine::{
    compute_results, is_complete, next_question, process_answer, progress, rewind,
    scored_answers, start, Progress,
};
pub use errors::AssessmentError;
pub use state::{restore, serialize, Answer, SessionSnapshot, SessionState, SNAPSHOT_VERSION};
