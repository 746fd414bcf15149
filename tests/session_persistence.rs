//! Integration tests for session persistence.
//!
//! A session is interrupted partway, saved, loaded by a fresh store instance
//! and finished; the results must match an uninterrupted run.

use std::sync::Arc;

use tempfile::TempDir;

use maturity_compass::adapters::{FileSessionStore, InMemorySessionStore, YamlQuestionSource};
use maturity_compass::domain::assessment::{
    compute_results, is_complete, next_question, process_answer, restore, serialize, start,
    SessionState,
};
use maturity_compass::domain::foundation::SessionId;
use maturity_compass::domain::questionnaire::QuestionBank;
use maturity_compass::domain::scoring::ResultAggregator;
use maturity_compass::ports::{QuestionBankSource, SessionStore};

fn bank() -> QuestionBank {
    YamlQuestionSource::embedded().load().unwrap()
}

/// Answers up to `limit` questions with each question's second option.
fn advance(bank: &QuestionBank, state: &mut SessionState, limit: usize) {
    for _ in 0..limit {
        let Some(question) = next_question(bank, state) else {
            return;
        };
        let (question_id, option_id) = (question.id.clone(), question.options[1].id.clone());
        process_answer(bank, state, &question_id, &option_id, Some(3_500)).unwrap();
    }
}

async fn interrupted_run(store: Arc<dyn SessionStore>, id: &str) {
    let bank = bank();
    let session_id = SessionId::new(id).unwrap();

    let mut state = start(&bank, session_id.clone());
    advance(&bank, &mut state, 9);
    store.save(&serialize(&state)).await.unwrap();
    drop(state);

    let mut resumed = restore(store.load(&session_id).await.unwrap()).unwrap();
    assert_eq!(resumed.answer_count(), 9);
    advance(&bank, &mut resumed, usize::MAX);
    assert!(is_complete(&resumed));

    let mut uninterrupted = start(&bank, session_id);
    advance(&bank, &mut uninterrupted, usize::MAX);

    let aggregator = ResultAggregator::default();
    assert_eq!(
        compute_results(&bank, &resumed, &aggregator).unwrap(),
        compute_results(&bank, &uninterrupted, &aggregator).unwrap()
    );
}

#[tokio::test]
async fn in_memory_store_resumes_sessions() {
    interrupted_run(Arc::new(InMemorySessionStore::new()), "memory-resume").await;
}

#[tokio::test]
async fn file_store_resumes_sessions() {
    let temp_dir = TempDir::new().unwrap();
    interrupted_run(Arc::new(FileSessionStore::new(temp_dir.path())), "file-resume").await;
    assert!(temp_dir.path().join("file-resume.yaml").exists());
}

#[tokio::test]
async fn file_store_survives_a_new_instance() {
    let temp_dir = TempDir::new().unwrap();
    let bank = bank();
    let mut state = start(&bank, SessionId::new("reopened").unwrap());
    advance(&bank, &mut state, 4);

    FileSessionStore::new(temp_dir.path())
        .save(&serialize(&state))
        .await
        .unwrap();
    let reopened = FileSessionStore::new(temp_dir.path());
    let loaded = restore(reopened.load(state.session_id()).await.unwrap()).unwrap();

    assert_eq!(loaded, state);
}
