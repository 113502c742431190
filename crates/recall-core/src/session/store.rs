use super::model::{ActionRecord, ConversationTurn, ProjectInfo, Session, ToolCallRecord};
use super::restore::{RestoreDiagnostic, restore_session};
use crate::bounded::push_bounded;
use crate::config::MemorySettings;
use crate::repository::SnapshotRepository;
use crate::tool::{ToolArgs, ToolInvocation, ToolResult};
use crate::workspace::WorkspaceInfo;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Owns the live [`Session`] and writes it through to the repository.
///
/// Every mutating method updates `last_activity`, regenerates the context
/// summary and then awaits a full snapshot write before returning. A failed
/// write is logged and the in-memory change is kept.
pub struct SessionStore {
    session: Session,
    workspace: WorkspaceInfo,
    settings: MemorySettings,
    repository: Arc<dyn SnapshotRepository>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &self.session)
            .field("workspace", &self.workspace)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Returned by [`SessionStore::restore`] when the previous session could not
/// be resumed. Carries a ready-to-use store with a fresh session.
pub struct RestoreFallback {
    store: SessionStore,
    diagnostic: RestoreDiagnostic,
}

impl RestoreFallback {
    pub fn diagnostic(&self) -> &RestoreDiagnostic {
        &self.diagnostic
    }

    pub fn into_fresh(self) -> SessionStore {
        self.store
    }
}

impl std::fmt::Debug for RestoreFallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestoreFallback")
            .field("session_id", &self.store.session.session_id)
            .field("diagnostic", &self.diagnostic)
            .finish()
    }
}

impl SessionStore {
    /// Creates a store around a brand-new session. Nothing is written until
    /// the first mutation.
    pub fn new(
        repository: Arc<dyn SnapshotRepository>,
        workspace: WorkspaceInfo,
        settings: MemorySettings,
    ) -> Self {
        Self::with_session(Session::new(), repository, workspace, settings)
    }

    fn with_session(
        mut session: Session,
        repository: Arc<dyn SnapshotRepository>,
        workspace: WorkspaceInfo,
        settings: MemorySettings,
    ) -> Self {
        session.refresh_summary(&workspace);
        Self {
            session,
            workspace,
            settings,
            repository,
        }
    }

    /// Resumes the stored session if it is present, readable and younger than
    /// the staleness threshold.
    ///
    /// # Errors
    ///
    /// Never fails in the usual sense: the `Err` side holds a fresh store and
    /// the reason the old one was not used, so the caller can log it.
    pub async fn restore(
        repository: Arc<dyn SnapshotRepository>,
        workspace: WorkspaceInfo,
        settings: MemorySettings,
    ) -> Result<Self, RestoreFallback> {
        let loaded = repository.load_session().await;
        match restore_session(loaded, Utc::now(), settings.staleness_threshold()) {
            Ok(session) => Ok(Self::with_session(session, repository, workspace, settings)),
            Err(diagnostic) => Err(RestoreFallback {
                store: Self::new(repository, workspace, settings),
                diagnostic,
            }),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Appends a conversation turn. Message bodies are kept verbatim.
    pub async fn record_turn(
        &mut self,
        user_message: impl Into<String>,
        ai_response: impl Into<String>,
        tool_calls: Vec<ToolInvocation>,
    ) {
        let turn = ConversationTurn {
            turn_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            user_message: user_message.into(),
            ai_response: ai_response.into(),
            tool_calls,
        };
        push_bounded(
            &mut self.session.conversation_history,
            turn,
            self.settings.max_history,
        );
        self.commit().await;
    }

    /// Appends a tool call; file writes mark their target path active.
    pub async fn record_tool_call(&mut self, tool_name: &str, args: ToolArgs, result: ToolResult) {
        if let Some(path) = args.written_path() {
            if self.session.active_files.insert(path) {
                tracing::debug!(path, "File marked active");
            }
        }

        let record = ToolCallRecord {
            timestamp: Utc::now(),
            tool: tool_name.to_string(),
            success: result.is_success(),
            args,
            result,
        };
        push_bounded(
            &mut self.session.tool_call_chain,
            record,
            self.settings.max_tool_calls,
        );
        self.commit().await;
    }

    /// Same as [`record_tool_call`](Self::record_tool_call) for untyped executor payloads.
    pub async fn record_raw_tool_call(&mut self, tool_name: &str, args: Value, result: Value) {
        let args = ToolArgs::parse(tool_name, args);
        self.record_tool_call(tool_name, args, ToolResult::from_raw(result))
            .await;
    }

    /// Appends an action record and returns its id.
    pub async fn record_action(
        &mut self,
        kind: impl Into<String>,
        details: Value,
        success: Option<bool>,
    ) -> String {
        let id = self.push_action(kind.into(), details, success);
        self.commit().await;
        id
    }

    fn push_action(&mut self, kind: String, details: Value, success: Option<bool>) -> String {
        let id = Uuid::new_v4().to_string();
        let record = ActionRecord {
            id: id.clone(),
            timestamp: Utc::now(),
            kind,
            details,
            success,
        };
        push_bounded(
            &mut self.session.recent_actions,
            record,
            self.settings.max_actions,
        );
        id
    }

    /// Replaces the user's intent and goals and logs an `intent_updated` action.
    pub async fn set_intent(&mut self, intent: impl Into<String>, goals: Vec<String>) {
        let intent = intent.into();
        let details = serde_json::json!({ "intent": intent, "goals": goals });
        self.session.user_intent = Some(intent);
        self.session.project_goals = goals;
        self.push_action("intent_updated".to_string(), details, Some(true));
        self.commit().await;
    }

    /// Sets the active project and logs a `project_set` action.
    pub async fn set_project(&mut self, project: ProjectInfo) {
        let details = serde_json::json!({
            "name": project.name,
            "type": project.project_type,
        });
        self.session.current_project = Some(project);
        self.push_action("project_set".to_string(), details, Some(true));
        self.commit().await;
    }

    /// Marks a path written outside the tool chain (e.g. an approved edit) as active.
    pub async fn mark_file_active(&mut self, path: &str) {
        self.session.active_files.insert(path);
        self.commit().await;
    }

    async fn commit(&mut self) {
        self.session.touch();
        self.session.refresh_summary(&self.workspace);
        self.persist().await;
    }

    /// Writes the session snapshot. Failures are logged, never returned.
    pub async fn persist(&self) {
        if let Err(e) = self.repository.save_session(&self.session).await {
            tracing::warn!(
                session_id = %self.session.session_id,
                error = %e,
                "Failed to persist session snapshot"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemorySnapshotRepository;
    use chrono::Duration;
    use serde_json::json;

    fn store_with_repo() -> (SessionStore, Arc<MemorySnapshotRepository>) {
        let repo = Arc::new(MemorySnapshotRepository::new());
        let store = SessionStore::new(
            repo.clone(),
            WorkspaceInfo::default(),
            MemorySettings::default(),
        );
        (store, repo)
    }

    #[tokio::test]
    async fn test_history_keeps_latest_hundred() {
        let (mut store, _repo) = store_with_repo();
        for i in 0..130 {
            store.record_turn(format!("msg {}", i), "ok", Vec::new()).await;
        }

        let history = &store.session().conversation_history;
        assert_eq!(history.len(), 100);
        assert_eq!(history.first().unwrap().user_message, "msg 30");
        assert_eq!(history.last().unwrap().user_message, "msg 129");
    }

    #[tokio::test]
    async fn test_large_messages_are_not_truncated() {
        let (mut store, _repo) = store_with_repo();
        let body = "x".repeat(50_000);
        store.record_turn(body.clone(), body.clone(), Vec::new()).await;
        assert_eq!(store.session().conversation_history[0].user_message.len(), 50_000);
    }

    #[tokio::test]
    async fn test_tool_chain_and_actions_are_capped() {
        let (mut store, _repo) = store_with_repo();
        for i in 0..210 {
            store
                .record_raw_tool_call("read_file", json!({"path": format!("f{}", i)}), json!("..."))
                .await;
        }
        for _ in 0..60 {
            store.record_action("noop", Value::Null, Some(true)).await;
        }
        assert_eq!(store.session().tool_call_chain.len(), 200);
        assert_eq!(store.session().recent_actions.len(), 50);
    }

    #[tokio::test]
    async fn test_write_tools_mark_active_files() {
        let (mut store, _repo) = store_with_repo();
        store
            .record_raw_tool_call(
                "write_file",
                json!({"path": "src/lib.rs", "content": ""}),
                json!({}),
            )
            .await;
        store
            .record_raw_tool_call("read_file", json!({"path": "README.md"}), json!("text"))
            .await;
        store
            .record_raw_tool_call(
                "edit_file",
                json!({"path": "src/lib.rs"}),
                json!({"error": "no match"}),
            )
            .await;

        let session = store.session();
        assert_eq!(session.active_files.len(), 1);
        assert!(session.active_files.contains("src/lib.rs"));
        assert!(!session.tool_call_chain[2].success);
        assert!(session.context_summary.contains("edit_file(✗)"));
    }

    #[tokio::test]
    async fn test_every_mutation_persists() {
        let (mut store, repo) = store_with_repo();
        store.record_turn("hi", "hello", Vec::new()).await;
        store.record_action("ping", Value::Null, None).await;
        store.set_intent("refactor storage", vec!["keep API".to_string()]).await;
        assert_eq!(repo.session_writes(), 3);

        let saved = repo.load_session().await.unwrap().unwrap();
        assert_eq!(saved.user_intent.as_deref(), Some("refactor storage"));
        assert_eq!(saved.recent_actions.last().unwrap().kind, "intent_updated");
    }

    #[tokio::test]
    async fn test_persistence_failure_keeps_memory_state() {
        let (mut store, repo) = store_with_repo();
        repo.set_fail_writes(true);
        store.record_turn("hi", "hello", Vec::new()).await;
        assert_eq!(store.session().conversation_history.len(), 1);
        assert_eq!(repo.session_writes(), 0);
    }

    #[tokio::test]
    async fn test_restore_within_window() {
        let (mut store, repo) = store_with_repo();
        store.record_turn("hi", "hello", Vec::new()).await;
        let id = store.session().session_id.clone();

        let restored =
            SessionStore::restore(repo, WorkspaceInfo::default(), MemorySettings::default())
                .await
                .unwrap();
        assert_eq!(restored.session().session_id, id);
        assert_eq!(restored.session().conversation_history.len(), 1);
    }

    #[tokio::test]
    async fn test_restore_stale_falls_back_to_fresh() {
        let repo = Arc::new(MemorySnapshotRepository::new());
        let mut old = Session::new();
        old.last_activity = Utc::now() - Duration::hours(2);
        let old_id = old.session_id.clone();
        repo.put_session(old).await;

        let fallback =
            SessionStore::restore(repo, WorkspaceInfo::default(), MemorySettings::default())
                .await
                .unwrap_err();
        assert!(matches!(fallback.diagnostic(), RestoreDiagnostic::Stale { .. }));
        let fresh = fallback.into_fresh();
        assert_ne!(fresh.session().session_id, old_id);
        assert!(fresh.session().conversation_history.is_empty());
    }
}
