//! Task domain model.

use crate::tool::ToolArgs;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Kind of work a task represents.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TaskType {
    Coding,
    Debugging,
    Testing,
    Analysis,
    Research,
    Optimization,
    Documentation,
    #[default]
    General,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TaskPriority {
    High,
    #[default]
    Medium,
    Low,
}

/// Lifecycle state of a task.
///
/// ```text
/// pending -> in_progress -> completed
/// in_progress <-> blocked
/// pending | in_progress | blocked -> cancelled
/// ```
/// Completion is also accepted from `pending` and `blocked`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Blocked,
    Cancelled,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether moving from `self` to `next` is allowed. Staying put always is.
    pub fn can_transition_to(self, next: TaskStatus) -> bool {
        use TaskStatus::*;
        match (self, next) {
            (current, next) if current == next => true,
            (current, _) if current.is_terminal() => false,
            (_, Completed | Cancelled) => true,
            (Pending, InProgress) | (InProgress, Blocked) | (Blocked, InProgress) => true,
            _ => false,
        }
    }
}

/// A tool call correlated with a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolUse {
    pub tool: String,
    pub args: ToolArgs,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskNote {
    pub note: String,
    pub timestamp: DateTime<Utc>,
}

/// A unit of user-intended work.
///
/// `progress == 100` exactly when `status == Completed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub description: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    /// 0..=100
    pub progress: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<i64>,
    /// Minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_task_id: Option<String>,
    #[serde(default)]
    pub subtasks: Vec<String>,
    #[serde(default)]
    pub related_files: Vec<String>,
    #[serde(default)]
    pub tools_used: Vec<ToolUse>,
    /// Not enforced; informational only.
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub notes: Vec<TaskNote>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

impl Task {
    pub fn new(
        id: String,
        description: impl Into<String>,
        task_type: TaskType,
        priority: TaskPriority,
        parent_task_id: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            description: description.into(),
            task_type,
            priority,
            status: TaskStatus::Pending,
            progress: 0,
            created_at: now,
            updated_at: now,
            completed_at: None,
            estimated_duration: None,
            actual_duration: None,
            parent_task_id,
            subtasks: Vec::new(),
            related_files: Vec::new(),
            tools_used: Vec::new(),
            dependencies: Vec::new(),
            notes: Vec::new(),
            result: None,
        }
    }
}

/// Partial update for [`TaskRegistry::update_task`](super::TaskRegistry::update_task).
///
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub task_type: Option<TaskType>,
    pub status: Option<TaskStatus>,
    pub progress: Option<u8>,
    pub estimated_duration: Option<i64>,
    pub actual_duration: Option<i64>,
    pub dependencies: Option<Vec<String>>,
    pub result: Option<String>,
}

impl TaskUpdate {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn progress(progress: u8) -> Self {
        Self {
            progress: Some(progress),
            ..Default::default()
        }
    }
}

/// Aggregate counters over every tracked task (open and archived).
///
/// Cancelled tasks are reported separately and excluded from `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskProgress {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub pending: usize,
    pub blocked: usize,
    pub cancelled: usize,
    /// Percentage of `total` that is completed, rounded.
    pub completion_rate: u8,
}
