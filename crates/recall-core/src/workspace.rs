//! Workspace context: facts about the project plus the task lists.

use crate::task::Task;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What the startup workspace scan found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceInfo {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    /// Top-level entries worth mentioning (e.g. `src/`, `tests/`).
    #[serde(default)]
    pub structure: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// An accepted file edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRecord {
    pub path: String,
    pub timestamp: DateTime<Utc>,
}

/// Last known build/test state of the workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BuildStatus {
    #[default]
    Unknown,
    Passing {
        checked_at: DateTime<Utc>,
    },
    Failing {
        checked_at: DateTime<Utc>,
        message: String,
    },
}

/// Durable per-workspace memory.
///
/// A task lives in exactly one of `current_tasks` or `completed_tasks`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceContext {
    #[serde(default)]
    pub workspace: WorkspaceInfo,
    #[serde(default)]
    pub recent_edits: Vec<EditRecord>,
    #[serde(default)]
    pub build_status: BuildStatus,
    #[serde(default)]
    pub current_tasks: Vec<Task>,
    /// Archive of finished (completed or cancelled) tasks, oldest first.
    #[serde(default)]
    pub completed_tasks: Vec<Task>,
    #[serde(default)]
    pub known_issues: Vec<String>,
    #[serde(default)]
    pub user_preferences: BTreeMap<String, String>,
}

impl WorkspaceContext {
    pub fn new(workspace: WorkspaceInfo) -> Self {
        Self {
            workspace,
            ..Default::default()
        }
    }

    /// Records an issue unless the same text is already known.
    pub fn add_known_issue(&mut self, issue: impl Into<String>) -> bool {
        let issue = issue.into();
        if self.known_issues.contains(&issue) {
            return false;
        }
        self.known_issues.push(issue);
        true
    }
}
