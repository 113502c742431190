//! File-backed [`SnapshotRepository`] storing one JSON document per snapshot.

use crate::dto::{self, VersionedSnapshot};
use crate::paths::RecallPaths;
use crate::storage::{AtomicFileError, AtomicJsonFile};
use async_trait::async_trait;
use recall_core::error::{RecallError, Result};
use recall_core::repository::SnapshotRepository;
use recall_core::session::Session;
use recall_core::workspace::WorkspaceContext;
use serde::de::DeserializeOwned;

impl From<AtomicFileError> for RecallError {
    fn from(err: AtomicFileError) -> Self {
        match err {
            AtomicFileError::Io(e) => e.into(),
            AtomicFileError::Json(e) => e.into(),
            AtomicFileError::Lock(message) => RecallError::data_access(message),
        }
    }
}

/// Stores `session.json` and `workspace.json` under the data directory.
///
/// Serialization happens on the caller's task; the file write itself runs on
/// tokio's blocking pool and is awaited, so saves land in call order.
pub struct JsonSnapshotRepository {
    session_file: AtomicJsonFile<VersionedSnapshot<Session>>,
    workspace_file: AtomicJsonFile<VersionedSnapshot<WorkspaceContext>>,
}

impl JsonSnapshotRepository {
    pub fn new(paths: &RecallPaths) -> Self {
        Self {
            session_file: AtomicJsonFile::new(paths.session_file()),
            workspace_file: AtomicJsonFile::new(paths.workspace_file()),
        }
    }
}

async fn load_snapshot<T>(file: &AtomicJsonFile<VersionedSnapshot<T>>) -> Result<Option<T>>
where
    T: DeserializeOwned + Send + 'static,
{
    let file = file.clone();
    let loaded = tokio::task::spawn_blocking(move || file.load())
        .await
        .map_err(|e| RecallError::internal(format!("snapshot read task failed: {e}")))??;

    loaded.map(VersionedSnapshot::into_domain).transpose()
}

async fn write_snapshot<T: 'static>(file: &AtomicJsonFile<T>, bytes: Vec<u8>) -> Result<()> {
    let file = file.clone();
    tokio::task::spawn_blocking(move || file.write_bytes(&bytes))
        .await
        .map_err(|e| RecallError::internal(format!("snapshot write task failed: {e}")))??;
    Ok(())
}

#[async_trait]
impl SnapshotRepository for JsonSnapshotRepository {
    async fn load_session(&self) -> Result<Option<Session>> {
        load_snapshot(&self.session_file).await
    }

    async fn save_session(&self, session: &Session) -> Result<()> {
        let bytes = dto::encode(session)?;
        write_snapshot(&self.session_file, bytes).await?;
        tracing::trace!(session_id = %session.session_id, "Session snapshot written");
        Ok(())
    }

    async fn load_workspace(&self) -> Result<Option<WorkspaceContext>> {
        load_snapshot(&self.workspace_file).await
    }

    async fn save_workspace(&self, workspace: &WorkspaceContext) -> Result<()> {
        let bytes = dto::encode(workspace)?;
        write_snapshot(&self.workspace_file, bytes).await?;
        tracing::trace!(
            current = workspace.current_tasks.len(),
            completed = workspace.completed_tasks.len(),
            "Workspace snapshot written"
        );
        Ok(())
    }
}
