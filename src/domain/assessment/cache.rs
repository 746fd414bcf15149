//! Memoized results per session.

use sha2::{Digest, Sha256};
use std::sync::Arc;

use super::{compute_results, AssessmentError, SessionState};
use crate::domain::questionnaire::QuestionBank;
use crate::domain::scoring::{AssessmentResult, ResultAggregator};

/// Identifies the answer list a result was computed from.
///
/// The length alone would miss an answer edited in place, so the key also
/// carries a digest of every answer, response time included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    answer_count: usize,
    fingerprint: [u8; 32],
}

impl CacheKey {
    pub fn of(state: &SessionState) -> Self {
        let mut hasher = Sha256::new();
        for answer in state.answers() {
            hasher.update(answer.question_id.as_bytes());
            hasher.update([0u8]);
            hasher.update(answer.selected_option_id.as_bytes());
            hasher.update([0u8]);
            match answer.response_time_ms {
                Some(ms) => {
                    hasher.update([1u8]);
                    hasher.update(ms.to_le_bytes());
                }
                None => hasher.update([0u8]),
            }
        }
        Self {
            answer_count: state.answer_count(),
            fingerprint: hasher.finalize().into(),
        }
    }
}

/// Holds the last computed result of one session.
#[derive(Debug, Default)]
pub struct ResultCache {
    entry: Option<(CacheKey, Arc<AssessmentResult>)>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached result while the answers are unchanged, otherwise
    /// recomputes and stores it.
    pub fn get_or_compute(
        &mut self,
        bank: &QuestionBank,
        state: &SessionState,
        aggregator: &ResultAggregator,
    ) -> Result<Arc<AssessmentResult>, AssessmentError> {
        let key = CacheKey::of(state);
        if let Some((cached_key, result)) = &self.entry {
            if *cached_key == key {
                return Ok(Arc::clone(result));
            }
        }
        let result = Arc::new(compute_results(bank, state, aggregator)?);
        self.entry = Some((key, Arc::clone(&result)));
        Ok(result)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }
}

/// Results of a completed session, memoized in `cache`.
pub fn get_results(
    bank: &QuestionBank,
    state: &SessionState,
    aggregator: &ResultAggregator,
    cache: &mut ResultCache,
) -> Result<Arc<AssessmentResult>, AssessmentError> {
    cache.get_or_compute(bank, state, aggregator)
}
