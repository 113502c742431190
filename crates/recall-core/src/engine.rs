//! The embedding-facing memory engine.
//!
//! [`MemoryEngine`] is an owned value: the application builds it once with
//! [`MemoryEngine::open`] and drives every call from one control flow. Each
//! mutation is persisted before the call returns.

use crate::bounded::push_bounded;
use crate::config::MemorySettings;
use crate::context::{ContextSnapshot, render_prompt};
use crate::repository::SnapshotRepository;
use crate::session::{ProjectInfo, Session, SessionStore};
use crate::task::{
    TaskPriority, TaskProgress, TaskRegistry, TaskStatus, TaskTelemetry, TaskType, TaskUpdate,
    detect_tasks,
};
use crate::tool::{ToolArgs, ToolInvocation, ToolResult};
use crate::workspace::{BuildStatus, EditRecord, WorkspaceContext, WorkspaceInfo};
use chrono::Utc;
use serde_json::{Value, json};
use std::sync::Arc;

pub struct MemoryEngine {
    session: SessionStore,
    tasks: TaskRegistry,
    repository: Arc<dyn SnapshotRepository>,
    settings: MemorySettings,
}

impl MemoryEngine {
    /// Loads both snapshots and decides restore-or-fresh for the session.
    ///
    /// `scan` is the startup workspace scan; when given it replaces the stored
    /// workspace facts. Unreadable snapshots are logged and replaced with
    /// empty state.
    pub async fn open(
        repository: Arc<dyn SnapshotRepository>,
        scan: Option<WorkspaceInfo>,
        telemetry: Arc<dyn TaskTelemetry>,
        settings: MemorySettings,
    ) -> Self {
        let settings = match settings.validate() {
            Ok(()) => settings,
            Err(e) => {
                tracing::warn!(error = %e, "Invalid memory settings, using defaults");
                MemorySettings::default()
            }
        };

        let mut context = match repository.load_workspace().await {
            Ok(Some(context)) => context,
            Ok(None) => WorkspaceContext::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Workspace snapshot unreadable, starting empty");
                WorkspaceContext::default()
            }
        };
        if let Some(info) = scan {
            context.workspace = info;
        }

        let session = match SessionStore::restore(
            repository.clone(),
            context.workspace.clone(),
            settings.clone(),
        )
        .await
        {
            Ok(store) => {
                tracing::info!(
                    session_id = %store.session().session_id,
                    turns = store.session().conversation_history.len(),
                    "Restored previous session"
                );
                store
            }
            Err(fallback) => {
                let diagnostic = fallback.diagnostic();
                if diagnostic.is_expected() {
                    tracing::info!("{}; starting a new session", diagnostic);
                } else {
                    tracing::warn!("{}; starting a new session", diagnostic);
                }
                fallback.into_fresh()
            }
        };

        let tasks = TaskRegistry::new(context, telemetry, settings.max_completed_tasks);

        Self {
            session,
            tasks,
            repository,
            settings,
        }
    }

    pub fn session(&self) -> &Session {
        self.session.session()
    }

    pub fn tasks(&self) -> &TaskRegistry {
        &self.tasks
    }

    pub fn workspace(&self) -> &WorkspaceContext {
        self.tasks.context()
    }

    pub fn settings(&self) -> &MemorySettings {
        &self.settings
    }

    // ------------------------------------------------------------------
    // Conversation and tools
    // ------------------------------------------------------------------

    pub async fn record_turn(
        &mut self,
        user_message: impl Into<String>,
        ai_response: impl Into<String>,
        tool_calls: Vec<ToolInvocation>,
    ) {
        self.session
            .record_turn(user_message, ai_response, tool_calls)
            .await;
    }

    pub async fn record_tool_call(&mut self, tool_name: &str, args: ToolArgs, result: ToolResult) {
        self.session.record_tool_call(tool_name, args, result).await;
    }

    pub async fn record_raw_tool_call(&mut self, tool_name: &str, args: Value, result: Value) {
        self.session
            .record_raw_tool_call(tool_name, args, result)
            .await;
    }

    /// Records a tool call and correlates it with a task. Writes also link
    /// the written file to the task.
    pub async fn record_task_tool_call(
        &mut self,
        task_id: &str,
        tool_name: &str,
        args: ToolArgs,
        result: ToolResult,
    ) -> bool {
        let linked = self.tasks.link_tool(task_id, tool_name, args.clone());
        if linked {
            if let Some(path) = args.written_path() {
                self.tasks.link_file(task_id, path);
            }
            self.persist_workspace().await;
        }
        self.session.record_tool_call(tool_name, args, result).await;
        linked
    }

    pub async fn record_action(
        &mut self,
        kind: impl Into<String>,
        details: Value,
        success: Option<bool>,
    ) -> String {
        self.session.record_action(kind, details, success).await
    }

    pub async fn set_intent(&mut self, intent: impl Into<String>, goals: Vec<String>) {
        self.session.set_intent(intent, goals).await;
    }

    pub async fn set_project(&mut self, project: ProjectInfo) {
        self.session.set_project(project).await;
    }

    /// Records the outcome of a human-approved (or rejected) file edit.
    pub async fn record_edit_outcome(&mut self, path: &str, accepted: bool) {
        let kind = if accepted { "edit_accepted" } else { "edit_rejected" };
        self.session
            .record_action(kind, json!({ "path": path }), Some(accepted))
            .await;

        if accepted {
            self.session.mark_file_active(path).await;
            let edit = EditRecord {
                path: path.to_string(),
                timestamp: Utc::now(),
            };
            let max_edits = self.settings.max_recent_edits;
            push_bounded(&mut self.tasks.context_mut().recent_edits, edit, max_edits);
            self.persist_workspace().await;
        }
    }

    // ------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------

    /// Runs the detector over user input and registers a task per match.
    ///
    /// Returns the new task ids (empty when nothing matched).
    pub async fn process_user_input(&mut self, input: &str) -> Vec<String> {
        let candidates = detect_tasks(input);
        let mut ids = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let id = self.tasks.create_task(
                candidate.description.clone(),
                candidate.priority,
                candidate.task_type,
                None,
            );
            self.session
                .record_action(
                    "task_detected",
                    json!({
                        "task_id": id,
                        "description": candidate.description,
                        "type": candidate.task_type,
                        "priority": candidate.priority,
                    }),
                    Some(true),
                )
                .await;
            ids.push(id);
        }
        if !ids.is_empty() {
            tracing::info!(count = ids.len(), "Detected tasks from user input");
            self.persist_workspace().await;
        }
        ids
    }

    pub async fn create_task(
        &mut self,
        description: impl Into<String>,
        priority: TaskPriority,
        task_type: TaskType,
        parent_task_id: Option<String>,
    ) -> String {
        let description = description.into();
        let id = self
            .tasks
            .create_task(description.clone(), priority, task_type, parent_task_id);
        self.session
            .record_action(
                "task_created",
                json!({
                    "task_id": id,
                    "description": description,
                    "type": task_type,
                    "priority": priority,
                }),
                Some(true),
            )
            .await;
        self.persist_workspace().await;
        id
    }

    pub async fn add_subtask(
        &mut self,
        parent_id: &str,
        description: impl Into<String>,
        priority: TaskPriority,
    ) -> Option<String> {
        let description = description.into();
        let id = self
            .tasks
            .add_subtask(parent_id, description.clone(), priority)?;
        self.session
            .record_action(
                "subtask_created",
                json!({ "task_id": id, "parent_task_id": parent_id, "description": description }),
                Some(true),
            )
            .await;
        self.persist_workspace().await;
        Some(id)
    }

    pub async fn update_task(&mut self, id: &str, update: TaskUpdate) -> bool {
        if !self.tasks.update_task(id, update) {
            return false;
        }
        self.after_task_change(id).await;
        true
    }

    pub async fn complete_task(&mut self, id: &str, result: Option<String>) -> bool {
        if !self.tasks.complete_task(id, result) {
            return false;
        }
        self.after_task_change(id).await;
        true
    }

    pub async fn cancel_task(&mut self, id: &str) -> bool {
        if !self.tasks.cancel_task(id) {
            return false;
        }
        self.after_task_change(id).await;
        true
    }

    async fn after_task_change(&mut self, id: &str) {
        if let Some(task) = self.tasks.get(id) {
            let kind = match task.status {
                TaskStatus::Completed => Some("task_completed"),
                TaskStatus::Cancelled => Some("task_cancelled"),
                _ => None,
            };
            if let Some(kind) = kind {
                let details = json!({
                    "task_id": task.id,
                    "description": task.description,
                    "duration_minutes": task.actual_duration,
                });
                let success = task.status == TaskStatus::Completed;
                self.session.record_action(kind, details, Some(success)).await;
            }
        }
        self.persist_workspace().await;
    }

    pub async fn link_file(&mut self, id: &str, path: &str) -> bool {
        let linked = self.tasks.link_file(id, path);
        if linked {
            self.persist_workspace().await;
        }
        linked
    }

    pub async fn link_tool(&mut self, id: &str, tool: &str, args: ToolArgs) -> bool {
        let linked = self.tasks.link_tool(id, tool, args);
        if linked {
            self.persist_workspace().await;
        }
        linked
    }

    pub async fn add_note(&mut self, id: &str, note: impl Into<String>) -> bool {
        let added = self.tasks.add_note(id, note);
        if added {
            self.persist_workspace().await;
        }
        added
    }

    pub fn task_progress(&self) -> TaskProgress {
        self.tasks.progress()
    }

    // ------------------------------------------------------------------
    // Workspace facts
    // ------------------------------------------------------------------

    pub async fn set_build_status(&mut self, status: BuildStatus) {
        self.tasks.context_mut().build_status = status;
        self.persist_workspace().await;
    }

    pub async fn add_known_issue(&mut self, issue: impl Into<String>) -> bool {
        let added = self.tasks.context_mut().add_known_issue(issue);
        if added {
            self.persist_workspace().await;
        }
        added
    }

    pub async fn set_user_preference(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tasks
            .context_mut()
            .user_preferences
            .insert(key.into(), value.into());
        self.persist_workspace().await;
    }

    // ------------------------------------------------------------------
    // Context
    // ------------------------------------------------------------------

    /// Structured, bounded view of memory. Pure read.
    pub fn context_for_ai(&self) -> ContextSnapshot {
        ContextSnapshot::assemble(
            self.session.session(),
            &self.tasks.context().workspace,
            &self.tasks,
            Utc::now(),
        )
    }

    /// `base_prompt` followed by the rendered context sections.
    pub fn enhanced_system_prompt(&self, base_prompt: &str) -> String {
        render_prompt(base_prompt, &self.context_for_ai())
    }

    /// Writes the workspace snapshot. Failures are logged, never returned.
    pub async fn persist_workspace(&self) {
        if let Err(e) = self.repository.save_workspace(self.tasks.context()).await {
            tracing::warn!(error = %e, "Failed to persist workspace snapshot");
        }
    }
}
