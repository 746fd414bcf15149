//! HTTP handlers for assessment endpoints.
//!
//! Each request loads the session snapshot, drives the engine and saves the
//! snapshot back. Requests for the same session are serialized by a
//! per-session lock; different sessions proceed independently. A lock entry
//! lives only while some request holds or awaits it, and at most
//! `result_capacity` result caches are kept, least recently used evicted first.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::assessment::{
    get_results, next_question, process_answer, progress, restore, rewind, serialize, start,
    ResultCache, SessionState,
};
use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::domain::questionnaire::QuestionBank;
use crate::domain::scoring::{AssessmentResult, ResultAggregator};
use crate::ports::{SessionStore, SessionStoreError};

use super::dto::{
    AssessmentStateResponse, ErrorResponse, GoBackRequest, HealthResponse,
    StartAssessmentRequest, SubmitAnswerRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

/// Result caches kept by default before the least recently used is evicted.
pub const DEFAULT_RESULT_CAPACITY: usize = 1024;

type SessionLocks = Arc<StdMutex<HashMap<SessionId, Arc<Mutex<()>>>>>;

#[derive(Clone)]
pub struct AssessmentHandlers {
    bank: Arc<QuestionBank>,
    store: Arc<dyn SessionStore>,
    aggregator: Arc<ResultAggregator>,
    results: Arc<Mutex<HashMap<SessionId, CachedResults>>>,
    result_capacity: usize,
    session_locks: SessionLocks,
}

struct CachedResults {
    cache: ResultCache,
    last_used: Instant,
}

/// Exclusive access to one session.
///
/// Dropping the last holder removes the lock entry.
struct SessionGuard {
    guard: Option<OwnedMutexGuard<()>>,
    id: SessionId,
    locks: SessionLocks,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        // Release the mutex first so our own reference no longer counts
        self.guard.take();
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        let idle = locks
            .get(&self.id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1);
        if idle {
            locks.remove(&self.id);
        }
    }
}

impl AssessmentHandlers {
    pub fn new(
        bank: Arc<QuestionBank>,
        store: Arc<dyn SessionStore>,
        aggregator: Arc<ResultAggregator>,
    ) -> Self {
        Self {
            bank,
            store,
            aggregator,
            results: Arc::new(Mutex::new(HashMap::new())),
            result_capacity: DEFAULT_RESULT_CAPACITY,
            session_locks: Arc::new(StdMutex::new(HashMap::new())),
        }
    }

    /// Bounds how many sessions keep a cached result (at least one).
    pub fn with_result_capacity(mut self, capacity: usize) -> Self {
        self.result_capacity = capacity.max(1);
        self
    }

    async fn lock_session(&self, id: &SessionId) -> SessionGuard {
        let mut session = SessionGuard {
            guard: None,
            id: id.clone(),
            locks: Arc::clone(&self.session_locks),
        };
        let lock = {
            let mut locks = self
                .session_locks
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(id.clone()).or_default())
        };
        session.guard = Some(lock.lock_owned().await);
        session
    }

    async fn load(&self, id: &SessionId) -> Result<SessionState, DomainError> {
        let snapshot = self.store.load(id).await?;
        Ok(restore(snapshot)?)
    }

    async fn save(&self, state: &SessionState) -> Result<(), DomainError> {
        self.store.save(&serialize(state)).await?;
        Ok(())
    }

    fn describe(&self, state: &SessionState) -> AssessmentStateResponse {
        AssessmentStateResponse::new(
            state,
            next_question(&self.bank, state),
            progress(&self.bank, state),
        )
    }

    async fn start(
        &self,
        request: StartAssessmentRequest,
    ) -> Result<AssessmentStateResponse, DomainError> {
        let id = match request.session_id {
            Some(raw) => SessionId::new(raw)?,
            None => SessionId::generate(),
        };
        let _guard = self.lock_session(&id).await;

        if self.store.exists(&id).await? {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Session already exists: {}", id),
            ));
        }

        let state = start(&self.bank, id);
        self.save(&state).await?;
        tracing::info!(session_id = %state.session_id(), "assessment started");
        Ok(self.describe(&state))
    }

    async fn current(&self, id: &SessionId) -> Result<AssessmentStateResponse, DomainError> {
        let state = self.load(id).await?;
        Ok(self.describe(&state))
    }

    async fn answer(
        &self,
        id: &SessionId,
        request: SubmitAnswerRequest,
    ) -> Result<AssessmentStateResponse, DomainError> {
        let _guard = self.lock_session(id).await;
        let mut state = self.load(id).await?;

        process_answer(
            &self.bank,
            &mut state,
            &request.question_id,
            &request.option_id,
            request.response_time_ms,
        )?;
        self.save(&state).await?;

        Ok(self.describe(&state))
    }

    async fn go_back(
        &self,
        id: &SessionId,
        request: GoBackRequest,
    ) -> Result<AssessmentStateResponse, DomainError> {
        let _guard = self.lock_session(id).await;
        let state = self.load(id).await?;

        let rewound = rewind(&self.bank, &state, request.steps)?;
        self.save(&rewound).await?;
        if let Some(cached) = self.results.lock().await.get_mut(id) {
            cached.cache.invalidate();
        }

        Ok(self.describe(&rewound))
    }

    async fn results(&self, id: &SessionId) -> Result<Arc<AssessmentResult>, DomainError> {
        let _guard = self.lock_session(id).await;
        let state = self.load(id).await?;

        let mut results = self.results.lock().await;
        if !results.contains_key(id) && results.len() >= self.result_capacity {
            evict_least_recent(&mut results);
        }
        let cached = results.entry(id.clone()).or_insert_with(|| CachedResults {
            cache: ResultCache::new(),
            last_used: Instant::now(),
        });
        cached.last_used = Instant::now();
        Ok(get_results(
            &self.bank,
            &state,
            &self.aggregator,
            &mut cached.cache,
        )?)
    }

    async fn delete(&self, id: &SessionId) -> Result<(), DomainError> {
        let _guard = self.lock_session(id).await;
        if !self.store.delete(id).await? {
            return Err(SessionStoreError::NotFound(id.clone()).into());
        }
        self.results.lock().await.remove(id);
        tracing::info!(session_id = %id, "assessment deleted");
        Ok(())
    }
}

fn evict_least_recent(results: &mut HashMap<SessionId, CachedResults>) {
    let oldest = results
        .iter()
        .min_by_key(|(_, cached)| cached.last_used)
        .map(|(id, _)| id.clone());
    if let Some(id) = oldest {
        results.remove(&id);
        tracing::debug!(session_id = %id, "evicted cached result");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /assessments - Start a new assessment
pub async fn start_assessment(
    State(handlers): State<AssessmentHandlers>,
    request: Option<Json<StartAssessmentRequest>>,
) -> Response {
    let request = request.map(|Json(req)| req).unwrap_or_default();

    match handlers.start(request).await {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(e) => handle_assessment_error(e),
    }
}

/// GET /assessments/:id/question - Get the next question
pub async fn current_question(
    State(handlers): State<AssessmentHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match SessionId::new(session_id) {
        Ok(id) => id,
        Err(e) => return handle_assessment_error(e.into()),
    };

    match handlers.current(&session_id).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => handle_assessment_error(e),
    }
}

/// POST /assessments/:id/answers - Record an answer
pub async fn submit_answer(
    State(handlers): State<AssessmentHandlers>,
    Path(session_id): Path<String>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Response {
    let session_id = match SessionId::new(session_id) {
        Ok(id) => id,
        Err(e) => return handle_assessment_error(e.into()),
    };

    match handlers.answer(&session_id, req).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => handle_assessment_error(e),
    }
}

/// POST /assessments/:id/back - Undo the most recent answers
pub async fn go_back(
    State(handlers): State<AssessmentHandlers>,
    Path(session_id): Path<String>,
    request: Option<Json<GoBackRequest>>,
) -> Response {
    let session_id = match SessionId::new(session_id) {
        Ok(id) => id,
        Err(e) => return handle_assessment_error(e.into()),
    };
    let request = request.map(|Json(req)| req).unwrap_or_default();

    match handlers.go_back(&session_id, request).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => handle_assessment_error(e),
    }
}

/// GET /assessments/:id/progress - Report how far the session has come
pub async fn get_progress(
    State(handlers): State<AssessmentHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match SessionId::new(session_id) {
        Ok(id) => id,
        Err(e) => return handle_assessment_error(e.into()),
    };

    match handlers.current(&session_id).await {
        Ok(view) => (StatusCode::OK, Json(view.progress)).into_response(),
        Err(e) => handle_assessment_error(e),
    }
}

/// GET /assessments/:id/results - Results of a completed assessment
pub async fn get_assessment_results(
    State(handlers): State<AssessmentHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match SessionId::new(session_id) {
        Ok(id) => id,
        Err(e) => return handle_assessment_error(e.into()),
    };

    match handlers.results(&session_id).await {
        Ok(result) => (StatusCode::OK, Json(result.as_ref())).into_response(),
        Err(e) => handle_assessment_error(e),
    }
}

/// DELETE /assessments/:id - Discard a session and its cached result
pub async fn delete_assessment(
    State(handlers): State<AssessmentHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match SessionId::new(session_id) {
        Ok(id) => id,
        Err(e) => return handle_assessment_error(e.into()),
    };

    match handlers.delete(&session_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => handle_assessment_error(e),
    }
}

/// GET /health - Liveness probe
pub async fn health(State(handlers): State<AssessmentHandlers>) -> Response {
    let response = HealthResponse {
        status: "ok",
        questions: handlers.bank.len(),
    };
    (StatusCode::OK, Json(response)).into_response()
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_assessment_error(error: DomainError) -> Response {
    let status = StatusCode::from_u16(error.code.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        tracing::error!(code = %error.code, error = %error.message, "assessment request failed");
    }
    (status, Json(ErrorResponse::from(&error))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemorySessionStore, YamlQuestionSource};
    use crate::domain::assessment::{is_complete, AssessmentError};
    use crate::ports::QuestionBankSource;

    fn handlers() -> AssessmentHandlers {
        AssessmentHandlers::new(
            Arc::new(YamlQuestionSource::embedded().load().unwrap()),
            Arc::new(InMemorySessionStore::new()),
            Arc::new(ResultAggregator::default()),
        )
    }

    /// Stores a session answered to completion with each question's first option.
    async fn completed_session(handlers: &AssessmentHandlers, id: &str) -> SessionId {
        let id = SessionId::new(id).unwrap();
        let mut state = start(&handlers.bank, id.clone());
        while !is_complete(&state) {
            let question = next_question(&handlers.bank, &state).unwrap();
            let (qid, oid) = (question.id.clone(), question.options[0].id.clone());
            process_answer(&handlers.bank, &mut state, &qid, &oid, Some(3_000)).unwrap();
        }
        handlers.save(&state).await.unwrap();
        id
    }

    fn lock_entries(handlers: &AssessmentHandlers) -> usize {
        handlers.session_locks.lock().unwrap().len()
    }

    mod session_bookkeeping {
        use super::*;

        #[tokio::test]
        async fn lock_entries_are_released_after_each_request() {
            let handlers = handlers();
            let view = handlers
                .start(StartAssessmentRequest::default())
                .await
                .unwrap();
            let id = SessionId::new(view.session_id.clone()).unwrap();
            let question = view.question.unwrap();

            handlers
                .answer(
                    &id,
                    SubmitAnswerRequest {
                        question_id: question.id.clone(),
                        option_id: question.options[0].id.clone(),
                        response_time_ms: None,
                    },
                )
                .await
                .unwrap();
            handlers.go_back(&id, GoBackRequest::default()).await.unwrap();

            assert_eq!(lock_entries(&handlers), 0);
        }

        #[tokio::test]
        async fn lock_entry_survives_while_held() {
            let handlers = handlers();
            let id = SessionId::new("held").unwrap();

            let guard = handlers.lock_session(&id).await;
            assert_eq!(lock_entries(&handlers), 1);
            drop(guard);
            assert_eq!(lock_entries(&handlers), 0);
        }

        #[tokio::test]
        async fn result_caches_are_bounded() {
            let handlers = handlers().with_result_capacity(2);
            let mut ids = Vec::new();
            for name in ["first", "second", "third"] {
                let id = completed_session(&handlers, name).await;
                handlers.results(&id).await.unwrap();
                ids.push(id);
            }

            {
                let results = handlers.results.lock().await;
                assert_eq!(results.len(), 2);
                assert!(!results.contains_key(&ids[0]));
            }
            let again = handlers.results(&ids[0]).await.unwrap();
            assert_eq!(
                *again,
                crate::domain::assessment::compute_results(
                    &handlers.bank,
                    &handlers.load(&ids[0]).await.unwrap(),
                    &handlers.aggregator,
                )
                .unwrap()
            );
            assert_eq!(handlers.results.lock().await.len(), 2);
            assert_eq!(lock_entries(&handlers), 0);
        }

        #[tokio::test]
        async fn delete_drops_the_session_and_its_result() {
            let handlers = handlers();
            let id = completed_session(&handlers, "leaving").await;
            handlers.results(&id).await.unwrap();

            handlers.delete(&id).await.unwrap();

            assert!(!handlers.store.exists(&id).await.unwrap());
            assert!(handlers.results.lock().await.is_empty());
            assert_eq!(lock_entries(&handlers), 0);
            let err = handlers.delete(&id).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::SessionNotFound);
        }
    }

    #[test]
    fn session_not_found_maps_to_404() {
        let error = SessionStoreError::NotFound(SessionId::generate());
        let response = handle_assessment_error(error.into());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unknown_option_maps_to_422() {
        let error = AssessmentError::UnknownOption {
            question_id: "q1".to_string(),
            option_id: "zz".to_string(),
        };
        let response = handle_assessment_error(error.into());
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_not_complete_maps_to_409() {
        let response = handle_assessment_error(AssessmentError::TestNotComplete.into());
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn storage_failure_maps_to_500() {
        let error = SessionStoreError::Io("disk full".to_string());
        let response = handle_assessment_error(error.into());
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
