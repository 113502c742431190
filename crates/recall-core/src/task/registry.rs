use super::model::{
    Task, TaskNote, TaskPriority, TaskProgress, TaskStatus, TaskType, TaskUpdate, ToolUse,
};
use super::telemetry::TaskTelemetry;
use crate::bounded::push_bounded;
use crate::tool::ToolArgs;
use crate::workspace::WorkspaceContext;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Owns the task lists of a [`WorkspaceContext`] and enforces the task
/// lifecycle.
///
/// Open tasks live in `current_tasks`. Setting a task to `Completed` (or
/// `Cancelled`) moves it into the bounded `completed_tasks` archive. Lookups
/// by id that miss return `false`/`None`; nothing here fails.
///
/// The registry is purely in-memory; persisting the context is the caller's
/// job (see [`MemoryEngine`](crate::engine::MemoryEngine)).
pub struct TaskRegistry {
    context: WorkspaceContext,
    telemetry: Arc<dyn TaskTelemetry>,
    max_completed: usize,
}

impl TaskRegistry {
    pub fn new(
        context: WorkspaceContext,
        telemetry: Arc<dyn TaskTelemetry>,
        max_completed: usize,
    ) -> Self {
        Self {
            context,
            telemetry,
            max_completed,
        }
    }

    pub fn context(&self) -> &WorkspaceContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut WorkspaceContext {
        &mut self.context
    }

    pub fn current_tasks(&self) -> &[Task] {
        &self.context.current_tasks
    }

    pub fn completed_tasks(&self) -> &[Task] {
        &self.context.completed_tasks
    }

    /// Finds a task in either list.
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.context
            .current_tasks
            .iter()
            .chain(self.context.completed_tasks.iter())
            .find(|t| t.id == id)
    }

    fn current_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.context.current_tasks.iter_mut().find(|t| t.id == id)
    }

    /// Creates a pending task and returns its id.
    pub fn create_task(
        &mut self,
        description: impl Into<String>,
        priority: TaskPriority,
        task_type: TaskType,
        parent_task_id: Option<String>,
    ) -> String {
        let id = Uuid::new_v4().to_string();
        let task = Task::new(id.clone(), description, task_type, priority, parent_task_id);

        self.telemetry
            .record_task_creation(&task.id, task.task_type, task.priority, &task.description);
        tracing::debug!(task_id = %task.id, task_type = %task.task_type, "Task created");

        self.context.current_tasks.push(task);
        id
    }

    /// Creates a child of `parent_id` with the parent's type.
    ///
    /// Returns `None` if the parent is not an open task.
    pub fn add_subtask(
        &mut self,
        parent_id: &str,
        description: impl Into<String>,
        priority: TaskPriority,
    ) -> Option<String> {
        let task_type = self.current_mut(parent_id)?.task_type;
        let child_id =
            self.create_task(description, priority, task_type, Some(parent_id.to_string()));
        if let Some(parent) = self.current_mut(parent_id) {
            parent.subtasks.push(child_id.clone());
            parent.updated_at = Utc::now();
        }
        Some(child_id)
    }

    /// Merges `update` into an open task.
    ///
    /// Returns `false` if the id is not an open task or the requested status
    /// change is not a legal transition. A progress of 100 or more completes
    /// the task.
    pub fn update_task(&mut self, id: &str, update: TaskUpdate) -> bool {
        let Some(index) = self.context.current_tasks.iter().position(|t| t.id == id) else {
            tracing::debug!(task_id = id, "Update for unknown task ignored");
            return false;
        };

        let mut target = update.status;
        if target.is_none() && update.progress.is_some_and(|p| p >= 100) {
            target = Some(TaskStatus::Completed);
        }

        let now = Utc::now();
        let task = &mut self.context.current_tasks[index];

        if let Some(next) = target {
            if !task.status.can_transition_to(next) {
                tracing::debug!(
                    task_id = id,
                    from = %task.status,
                    to = %next,
                    "Rejected task status transition"
                );
                return false;
            }
        }

        if let Some(description) = update.description {
            task.description = description;
        }
        if let Some(priority) = update.priority {
            task.priority = priority;
        }
        if let Some(task_type) = update.task_type {
            task.task_type = task_type;
        }
        if let Some(minutes) = update.estimated_duration {
            task.estimated_duration = Some(minutes);
        }
        if let Some(minutes) = update.actual_duration {
            task.actual_duration = Some(minutes);
        }
        if let Some(dependencies) = update.dependencies {
            task.dependencies = dependencies;
        }
        if update.result.is_some() {
            task.result = update.result;
        }
        if let Some(progress) = update.progress {
            task.progress = progress.min(99);
        }
        if let Some(next) = target {
            task.status = next;
        }
        task.updated_at = now;

        match target {
            Some(TaskStatus::Completed) => self.archive(index, now, true),
            Some(TaskStatus::Cancelled) => self.archive(index, now, false),
            _ => {}
        }
        true
    }

    /// Completes an open task, optionally recording a result.
    pub fn complete_task(&mut self, id: &str, result: Option<String>) -> bool {
        self.update_task(
            id,
            TaskUpdate {
                status: Some(TaskStatus::Completed),
                result,
                ..Default::default()
            },
        )
    }

    pub fn cancel_task(&mut self, id: &str) -> bool {
        self.update_task(id, TaskUpdate::status(TaskStatus::Cancelled))
    }

    /// Moves the task at `index` from the open list into the archive.
    fn archive(&mut self, index: usize, now: DateTime<Utc>, completed: bool) {
        let mut task = self.context.current_tasks.remove(index);
        if completed {
            task.progress = 100;
        }
        task.completed_at = Some(now);
        if task.actual_duration.is_none() {
            task.actual_duration = Some((now - task.created_at).num_minutes());
        }

        self.telemetry.record_task_completion(
            &task.id,
            task.task_type,
            task.actual_duration.unwrap_or_default(),
            completed,
            task.result.as_deref(),
        );
        tracing::debug!(task_id = %task.id, status = %task.status, "Task archived");

        push_bounded(&mut self.context.completed_tasks, task, self.max_completed);
    }

    /// Associates a file with an open task. Linking the same path twice is a no-op.
    pub fn link_file(&mut self, id: &str, path: &str) -> bool {
        let Some(task) = self.current_mut(id) else {
            return false;
        };
        if !task.related_files.iter().any(|p| p == path) {
            task.related_files.push(path.to_string());
            task.updated_at = Utc::now();
        }
        true
    }

    pub fn link_tool(&mut self, id: &str, tool: &str, args: ToolArgs) -> bool {
        let Some(task) = self.current_mut(id) else {
            return false;
        };
        let now = Utc::now();
        task.tools_used.push(ToolUse {
            tool: tool.to_string(),
            args,
            timestamp: now,
        });
        task.updated_at = now;
        true
    }

    pub fn add_note(&mut self, id: &str, note: impl Into<String>) -> bool {
        let Some(task) = self.current_mut(id) else {
            return false;
        };
        let now = Utc::now();
        task.notes.push(TaskNote {
            note: note.into(),
            timestamp: now,
        });
        task.updated_at = now;
        true
    }

    /// Counters over open and archived tasks.
    pub fn progress(&self) -> TaskProgress {
        let mut progress = TaskProgress::default();
        for task in self
            .context
            .current_tasks
            .iter()
            .chain(self.context.completed_tasks.iter())
        {
            match task.status {
                TaskStatus::Completed => progress.completed += 1,
                TaskStatus::InProgress => progress.in_progress += 1,
                TaskStatus::Pending => progress.pending += 1,
                TaskStatus::Blocked => progress.blocked += 1,
                TaskStatus::Cancelled => progress.cancelled += 1,
            }
        }
        progress.total =
            progress.completed + progress.in_progress + progress.pending + progress.blocked;
        if progress.total > 0 {
            progress.completion_rate =
                ((progress.completed as f64 / progress.total as f64) * 100.0).round() as u8;
        }
        progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::telemetry::NoopTelemetry;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTelemetry {
        created: Mutex<Vec<String>>,
        completed: Mutex<Vec<(String, bool)>>,
    }

    impl TaskTelemetry for RecordingTelemetry {
        fn record_task_creation(&self, task_id: &str, _: TaskType, _: TaskPriority, _: &str) {
            self.created.lock().unwrap().push(task_id.to_string());
        }

        fn record_task_completion(
            &self,
            task_id: &str,
            _: TaskType,
            _: i64,
            success: bool,
            _: Option<&str>,
        ) {
            self.completed.lock().unwrap().push((task_id.to_string(), success));
        }
    }

    fn registry() -> TaskRegistry {
        TaskRegistry::new(WorkspaceContext::default(), Arc::new(NoopTelemetry), 50)
    }

    fn create(registry: &mut TaskRegistry, description: &str) -> String {
        registry.create_task(description, TaskPriority::Medium, TaskType::General, None)
    }

    #[test]
    fn test_create_task_defaults() {
        let mut registry = registry();
        let id = create(&mut registry, "Write docs");
        let task = registry.get(&id).unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.progress, 0);
        assert_eq!(registry.current_tasks().len(), 1);
    }

    #[test]
    fn test_zero_archive_cap_keeps_just_completed_task() {
        let mut registry =
            TaskRegistry::new(WorkspaceContext::default(), Arc::new(NoopTelemetry), 0);
        let id = create(&mut registry, "Ship it");
        assert!(registry.complete_task(&id, None));

        let task = registry.get(&id).unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(registry.completed_tasks().len(), 1);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut registry = registry();
        let a = create(&mut registry, "a");
        let b = create(&mut registry, "b");
        assert_ne!(a, b);
    }

    #[test]
    fn test_complete_moves_task_to_archive() {
        let mut registry = registry();
        let id = create(&mut registry, "Fix bug");
        assert!(registry.update_task(&id, TaskUpdate::status(TaskStatus::InProgress)));
        assert!(registry.complete_task(&id, Some("patched".to_string())));

        assert!(registry.current_tasks().is_empty());
        let task = registry.get(&id).unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.progress, 100);
        assert!(task.completed_at.is_some());
        assert!(task.actual_duration.is_some());
        assert_eq!(task.result.as_deref(), Some("patched"));
        assert_eq!(registry.completed_tasks().len(), 1);
    }

    #[test]
    fn test_update_to_completed_is_intercepted() {
        let mut registry = registry();
        let id = create(&mut registry, "Refactor");
        assert!(registry.update_task(&id, TaskUpdate::status(TaskStatus::Completed)));
        let task = registry.get(&id).unwrap();
        assert_eq!(task.progress, 100);
        assert!(registry.current_tasks().iter().all(|t| t.id != id));
    }

    #[test]
    fn test_progress_hundred_completes() {
        let mut registry = registry();
        let id = create(&mut registry, "Refactor");
        assert!(registry.update_task(&id, TaskUpdate::progress(100)));
        assert_eq!(registry.get(&id).unwrap().status, TaskStatus::Completed);
    }

    #[test]
    fn test_progress_below_completion_is_capped() {
        let mut registry = registry();
        let id = create(&mut registry, "Refactor");
        let update = TaskUpdate {
            status: Some(TaskStatus::InProgress),
            progress: Some(100),
            ..Default::default()
        };
        assert!(registry.update_task(&id, update));
        let task = registry.get(&id).unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.progress, 99);
    }

    #[test]
    fn test_illegal_transition_is_rejected() {
        let mut registry = registry();
        let id = create(&mut registry, "Investigate");
        assert!(!registry.update_task(&id, TaskUpdate::status(TaskStatus::Blocked)));
        assert_eq!(registry.get(&id).unwrap().status, TaskStatus::Pending);
    }

    #[test]
    fn test_completed_archive_is_bounded() {
        let mut registry =
            TaskRegistry::new(WorkspaceContext::default(), Arc::new(NoopTelemetry), 50);
        let ids: Vec<String> = (0..55).map(|i| create(&mut registry, &format!("t{}", i))).collect();
        for id in &ids {
            assert!(registry.complete_task(id, None));
        }

        let archive = registry.completed_tasks();
        assert_eq!(archive.len(), 50);
        assert_eq!(archive.first().unwrap().id, ids[5]);
        assert_eq!(archive.last().unwrap().id, ids[54]);
    }

    #[test]
    fn test_cancel_archives_without_completing() {
        let mut registry = registry();
        let id = create(&mut registry, "Drop me");
        assert!(registry.cancel_task(&id));
        let task = registry.get(&id).unwrap();
        assert_eq!(task.status, TaskStatus::Cancelled);
        assert!(task.progress < 100);
        assert!(registry.current_tasks().is_empty());
        assert!(!registry.complete_task(&id, None));
    }

    #[test]
    fn test_subtask_inherits_type() {
        let mut registry = registry();
        let parent = registry.create_task("Build API", TaskPriority::High, TaskType::Coding, None);
        let child = registry.add_subtask(&parent, "Add routes", TaskPriority::Low).unwrap();

        let child_task = registry.get(&child).unwrap();
        assert_eq!(child_task.task_type, TaskType::Coding);
        assert_eq!(child_task.priority, TaskPriority::Low);
        assert_eq!(child_task.parent_task_id.as_deref(), Some(parent.as_str()));
        assert_eq!(registry.get(&parent).unwrap().subtasks, vec![child]);
        assert!(registry.add_subtask("missing", "x", TaskPriority::Low).is_none());
    }

    #[test]
    fn test_link_file_is_idempotent() {
        let mut registry = registry();
        let id = create(&mut registry, "Edit");
        assert!(registry.link_file(&id, "/a/b.ts"));
        assert!(registry.link_file(&id, "/a/b.ts"));
        assert_eq!(registry.get(&id).unwrap().related_files, vec!["/a/b.ts".to_string()]);
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let mut registry = registry();
        assert!(!registry.update_task("nope", TaskUpdate::progress(10)));
        assert!(!registry.complete_task("nope", None));
        assert!(!registry.link_file("nope", "a"));
        assert!(!registry.add_note("nope", "n"));
        let args = ToolArgs::Other {
            value: serde_json::Value::Null,
        };
        assert!(!registry.link_tool("nope", "read_file", args));
    }

    #[test]
    fn test_notes_and_tools_append() {
        let mut registry = registry();
        let id = create(&mut registry, "Edit");
        registry.add_note(&id, "first");
        registry.add_note(&id, "second");
        let args = ToolArgs::parse("read_file", serde_json::json!({"path": "a"}));
        registry.link_tool(&id, "read_file", args);
        let task = registry.get(&id).unwrap();
        assert_eq!(task.notes.len(), 2);
        assert_eq!(task.notes[1].note, "second");
        assert_eq!(task.tools_used[0].tool, "read_file");
    }

    #[test]
    fn test_progress_spans_open_and_archived() {
        let mut registry = registry();
        let a = create(&mut registry, "a");
        let b = create(&mut registry, "b");
        let c = create(&mut registry, "c");
        let d = create(&mut registry, "d");
        registry.complete_task(&a, None);
        registry.update_task(&b, TaskUpdate::status(TaskStatus::InProgress));
        registry.cancel_task(&d);

        let progress = registry.progress();
        assert_eq!(progress.total, 3);
        assert_eq!(progress.completed, 1);
        assert_eq!(progress.in_progress, 1);
        assert_eq!(progress.pending, 1);
        assert_eq!(progress.cancelled, 1);
        assert_eq!(progress.completion_rate, 33);
        assert!(registry.get(&c).is_some());
    }

    #[test]
    fn test_telemetry_events() {
        let telemetry = Arc::new(RecordingTelemetry::default());
        let mut registry = TaskRegistry::new(WorkspaceContext::default(), telemetry.clone(), 50);
        let a = create(&mut registry, "a");
        let b = create(&mut registry, "b");
        registry.complete_task(&a, None);
        registry.cancel_task(&b);

        assert_eq!(telemetry.created.lock().unwrap().len(), 2);
        assert_eq!(
            *telemetry.completed.lock().unwrap(),
            vec![(a, true), (b, false)]
        );
    }
}
