use super::truncate;
use crate::bounded::tail;
use crate::session::{ActionRecord, ConversationTurn, ProjectInfo, Session, ToolCallRecord};
use crate::task::{Task, TaskPriority, TaskProgress, TaskRegistry, TaskStatus, TaskType};
use crate::workspace::WorkspaceInfo;
use chrono::{DateTime, Utc};
use serde::Serialize;

const RECENT_ACTIONS: usize = 5;
const RECENT_TOOL_CALLS: usize = 10;
const RECENT_TURNS: usize = 3;
const ACTIVE_TASKS: usize = 5;
const COMPLETED_TASKS: usize = 3;
const ACTIVE_TASK_CHARS: usize = 100;
const COMPLETED_TASK_CHARS: usize = 80;

/// Condensed view of a task for prompt injection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskBrief {
    pub id: String,
    pub description: String,
    pub task_type: TaskType,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub progress: u8,
}

impl TaskBrief {
    fn from_task(task: &Task, max_chars: usize) -> Self {
        Self {
            id: task.id.clone(),
            description: truncate(&task.description, max_chars),
            task_type: task.task_type,
            priority: task.priority,
            status: task.status,
            progress: task.progress,
        }
    }
}

/// Bounded, prompt-ready view of the session and task state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextSnapshot {
    /// First 8 characters of the session id.
    pub session_id: String,
    pub session_minutes: i64,
    pub context_summary: String,
    pub current_project: Option<ProjectInfo>,
    pub user_intent: Option<String>,
    pub project_goals: Vec<String>,
    pub recent_actions: Vec<ActionRecord>,
    pub recent_tool_calls: Vec<ToolCallRecord>,
    pub recent_turns: Vec<ConversationTurn>,
    pub active_files: Vec<String>,
    /// Most recently created open tasks first.
    pub active_tasks: Vec<TaskBrief>,
    pub task_progress: TaskProgress,
    /// Most recently completed first.
    pub recently_completed: Vec<TaskBrief>,
}

impl ContextSnapshot {
    /// Reads the current state; nothing is mutated.
    pub fn assemble(
        session: &Session,
        workspace: &WorkspaceInfo,
        registry: &TaskRegistry,
        now: DateTime<Utc>,
    ) -> Self {
        // current_tasks is in creation order
        let active_tasks = registry
            .current_tasks()
            .iter()
            .rev()
            .take(ACTIVE_TASKS)
            .map(|task| TaskBrief::from_task(task, ACTIVE_TASK_CHARS))
            .collect();

        let recently_completed = registry
            .completed_tasks()
            .iter()
            .rev()
            .filter(|task| task.status == TaskStatus::Completed)
            .take(COMPLETED_TASKS)
            .map(|task| TaskBrief::from_task(task, COMPLETED_TASK_CHARS))
            .collect();

        Self {
            session_id: session.short_id().to_string(),
            session_minutes: session.duration_minutes(now),
            context_summary: session.build_summary(workspace),
            current_project: session.current_project.clone(),
            user_intent: session.user_intent.clone(),
            project_goals: session.project_goals.clone(),
            recent_actions: tail(&session.recent_actions, RECENT_ACTIONS).to_vec(),
            recent_tool_calls: tail(&session.tool_call_chain, RECENT_TOOL_CALLS).to_vec(),
            recent_turns: tail(&session.conversation_history, RECENT_TURNS).to_vec(),
            active_files: session.active_files.iter().map(str::to_string).collect(),
            active_tasks,
            task_progress: registry.progress(),
            recently_completed,
        }
    }
}
