//! Snapshot persistence interface.
//!
//! The engine keeps exactly two durable snapshots: the [`Session`] and the
//! [`WorkspaceContext`]. Each save is a whole-snapshot rewrite.

use crate::error::{RecallError, Result};
use crate::session::Session;
use crate::workspace::WorkspaceContext;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// An abstract store for the session and workspace snapshots.
///
/// `load_*` returns `Ok(None)` when nothing has been stored yet and an error
/// when a snapshot exists but cannot be read or parsed.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    async fn load_session(&self) -> Result<Option<Session>>;

    async fn save_session(&self, session: &Session) -> Result<()>;

    async fn load_workspace(&self) -> Result<Option<WorkspaceContext>>;

    async fn save_workspace(&self, workspace: &WorkspaceContext) -> Result<()>;
}

/// Keeps snapshots in process memory.
///
/// Used when no durable storage is wanted, and in tests. Writes can be made
/// to fail on demand to exercise the degraded-persistence path.
#[derive(Default)]
pub struct MemorySnapshotRepository {
    session: Mutex<Option<Session>>,
    workspace: Mutex<Option<WorkspaceContext>>,
    fail_writes: AtomicBool,
    session_writes: AtomicUsize,
    workspace_writes: AtomicUsize,
}

impl MemorySnapshotRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent save return an I/O error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful session saves.
    pub fn session_writes(&self) -> usize {
        self.session_writes.load(Ordering::SeqCst)
    }

    /// Number of successful workspace saves.
    pub fn workspace_writes(&self) -> usize {
        self.workspace_writes.load(Ordering::SeqCst)
    }

    /// Replaces the stored session snapshot directly.
    pub async fn put_session(&self, session: Session) {
        *self.session.lock().await = Some(session);
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RecallError::io("snapshot store is read-only"));
        }
        Ok(())
    }
}

#[async_trait]
impl SnapshotRepository for MemorySnapshotRepository {
    async fn load_session(&self) -> Result<Option<Session>> {
        Ok(self.session.lock().await.clone())
    }

    async fn save_session(&self, session: &Session) -> Result<()> {
        self.check_writable()?;
        *self.session.lock().await = Some(session.clone());
        self.session_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn load_workspace(&self) -> Result<Option<WorkspaceContext>> {
        Ok(self.workspace.lock().await.clone())
    }

    async fn save_workspace(&self, workspace: &WorkspaceContext) -> Result<()> {
        self.check_writable()?;
        *self.workspace.lock().await = Some(workspace.clone());
        self.workspace_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
