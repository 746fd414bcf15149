//! SessionStore port - persistence for session snapshots.
//!
//! The engine only guarantees the snapshot round trip; how snapshots are
//! kept is up to the adapter.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::assessment::SessionSnapshot;
use crate::domain::foundation::{DomainError, ErrorCode, SessionId};

/// Errors raised by session stores.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionStoreError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("Storage I/O failed: {0}")]
    Io(String),

    #[error("Stored session is corrupt: {0}")]
    Corrupt(String),
}

impl From<SessionStoreError> for DomainError {
    fn from(err: SessionStoreError) -> Self {
        let code = match err {
            SessionStoreError::NotFound(_) => ErrorCode::SessionNotFound,
            SessionStoreError::Io(_) | SessionStoreError::Corrupt(_) => ErrorCode::StorageError,
        };
        DomainError::new(code, err.to_string())
    }
}

/// Port for persisting session snapshots.
///
/// Implementations must be safe to share between request handlers.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Inserts or replaces the snapshot for its session.
    async fn save(&self, snapshot: &SessionSnapshot) -> Result<(), SessionStoreError>;

    /// Loads a snapshot.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no snapshot exists for the id
    async fn load(&self, id: &SessionId) -> Result<SessionSnapshot, SessionStoreError>;

    /// Removes a snapshot. Returns true if one existed.
    async fn delete(&self, id: &SessionId) -> Result<bool, SessionStoreError>;

    async fn exists(&self, id: &SessionId) -> Result<bool, SessionStoreError>;
}
