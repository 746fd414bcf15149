//! File-based Session Store Adapter
//!
//! Stores each session snapshot as `<session_id>.yaml` in one directory.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::assessment::SessionSnapshot;
use crate::domain::foundation::SessionId;
use crate::ports::{SessionStore, SessionStoreError};

/// File-based storage for session snapshots
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    base_path: PathBuf,
}

impl FileSessionStore {
    /// Create a new file store rooted at `base_path`
    ///
    /// The directory is created on first save.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Session ids never contain path separators, so the join stays inside
    /// the base directory.
    fn session_file_path(&self, id: &SessionId) -> PathBuf {
        self.base_path.join(format!("{}.yaml", id.as_str()))
    }

    async fn ensure_dir(&self) -> Result<(), SessionStoreError> {
        fs::create_dir_all(&self.base_path).await.map_err(|e| {
            tracing::error!(
                path = %self.base_path.display(),
                error = %e,
                "failed to create session directory"
            );
            SessionStoreError::Io(e.to_string())
        })
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn save(&self, snapshot: &SessionSnapshot) -> Result<(), SessionStoreError> {
        self.ensure_dir().await?;

        let yaml = serde_yaml::to_string(snapshot)
            .map_err(|e| SessionStoreError::Corrupt(e.to_string()))?;

        // Readers never see a partially written snapshot
        let file_path = self.session_file_path(snapshot.state.session_id());
        let tmp_path = file_path.with_extension("yaml.tmp");
        fs::write(&tmp_path, yaml).await.map_err(|e| {
            tracing::error!(path = %tmp_path.display(), error = %e, "failed to write session");
            SessionStoreError::Io(e.to_string())
        })?;
        fs::rename(&tmp_path, &file_path)
            .await
            .map_err(|e| SessionStoreError::Io(e.to_string()))?;

        Ok(())
    }

    async fn load(&self, id: &SessionId) -> Result<SessionSnapshot, SessionStoreError> {
        let file_path = self.session_file_path(id);

        let yaml = match fs::read_to_string(&file_path).await {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(session_id = %id, "session file not found");
                return Err(SessionStoreError::NotFound(id.clone()));
            }
            Err(e) => {
                tracing::error!(path = %file_path.display(), error = %e, "failed to read session");
                return Err(SessionStoreError::Io(e.to_string()));
            }
        };

        serde_yaml::from_str(&yaml).map_err(|e| SessionStoreError::Corrupt(e.to_string()))
    }

    async fn delete(&self, id: &SessionId) -> Result<bool, SessionStoreError> {
        match fs::remove_file(self.session_file_path(id)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(SessionStoreError::Io(e.to_string())),
        }
    }

    async fn exists(&self, id: &SessionId) -> Result<bool, SessionStoreError> {
        fs::try_exists(self.session_file_path(id))
            .await
            .map_err(|e| SessionStoreError::Io(e.to_string()))
    }
}
