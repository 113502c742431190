//! Session domain model.
//!
//! A [`Session`] is the root record of one interactive run: the conversation,
//! the tool history, recent actions, touched files and the user's intent.

use crate::bounded::tail;
use crate::tool::{ToolArgs, ToolInvocation, ToolResult};
use crate::workspace::WorkspaceInfo;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// One user/assistant exchange. Message bodies are stored verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub turn_id: String,
    pub timestamp: DateTime<Utc>,
    pub user_message: String,
    pub ai_response: String,
    #[serde(default)]
    pub tool_calls: Vec<ToolInvocation>,
}

/// A single tool execution reported by the tool executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub timestamp: DateTime<Utc>,
    pub tool: String,
    pub args: ToolArgs,
    pub result: ToolResult,
    pub success: bool,
}

/// Something the engine or the user did that is worth remembering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// Free-form tag, e.g. `task_created`.
    pub kind: String,
    #[serde(default)]
    pub details: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
}

/// The project the user is currently working on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub project_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_project_status")]
    pub status: String,
    pub started_at: DateTime<Utc>,
}

fn default_project_status() -> String {
    "active".to_string()
}

impl ProjectInfo {
    pub fn new(
        name: impl Into<String>,
        project_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            project_type: project_type.into(),
            description: description.into(),
            status: default_project_status(),
            started_at: Utc::now(),
        }
    }
}

/// Paths targeted by write operations, in first-write order, without duplicates.
///
/// Membership only grows during a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveFiles(Vec<String>);

impl ActiveFiles {
    /// Adds a path; returns `false` if it was already present.
    pub fn insert(&mut self, path: impl Into<String>) -> bool {
        let path = path.into();
        if self.contains(&path) {
            return false;
        }
        self.0.push(path);
        true
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.iter().any(|p| p == path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// The `n` most recently added paths.
    pub fn recent(&self, n: usize) -> &[String] {
        tail(&self.0, n)
    }
}

/// Root in-memory record of one interactive run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub start_time: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    #[serde(default)]
    pub conversation_history: Vec<ConversationTurn>,
    #[serde(default)]
    pub tool_call_chain: Vec<ToolCallRecord>,
    #[serde(default)]
    pub recent_actions: Vec<ActionRecord>,
    #[serde(default)]
    pub active_files: ActiveFiles,
    #[serde(default)]
    pub user_intent: Option<String>,
    #[serde(default)]
    pub project_goals: Vec<String>,
    #[serde(default)]
    pub current_project: Option<ProjectInfo>,
    /// Derived cache, regenerated by [`Session::refresh_summary`].
    #[serde(default)]
    pub context_summary: String,
}

impl Session {
    /// Creates a fresh session with a new id.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            session_id: Uuid::new_v4().to_string(),
            start_time: now,
            last_activity: now,
            conversation_history: Vec::new(),
            tool_call_chain: Vec::new(),
            recent_actions: Vec::new(),
            active_files: ActiveFiles::default(),
            user_intent: None,
            project_goals: Vec::new(),
            current_project: None,
            context_summary: String::new(),
        }
    }

    /// First 8 characters of the id, for banners.
    pub fn short_id(&self) -> &str {
        match self.session_id.char_indices().nth(8) {
            Some((idx, _)) => &self.session_id[..idx],
            None => &self.session_id,
        }
    }

    /// Time since `last_activity`.
    pub fn idle_for(&self, now: DateTime<Utc>) -> Duration {
        now - self.last_activity
    }

    /// Whether the session went idle longer than `threshold`.
    pub fn is_stale(&self, now: DateTime<Utc>, threshold: Duration) -> bool {
        self.idle_for(now) > threshold
    }

    /// Session length in whole minutes.
    pub fn duration_minutes(&self, now: DateTime<Utc>) -> i64 {
        (now - self.start_time).num_minutes().max(0)
    }

    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    /// Recomputes `context_summary` from the authoritative fields.
    pub fn refresh_summary(&mut self, workspace: &WorkspaceInfo) {
        self.context_summary = self.build_summary(workspace);
    }

    /// Builds the summary without storing it.
    pub fn build_summary(&self, workspace: &WorkspaceInfo) -> String {
        let mut parts = Vec::new();

        match (&workspace.project_type, &workspace.language) {
            (Some(kind), Some(language)) => {
                parts.push(format!("Workspace: {} ({})", kind, language))
            }
            (Some(kind), None) => parts.push(format!("Workspace: {}", kind)),
            (None, Some(language)) => parts.push(format!("Workspace: {}", language)),
            (None, None) => {}
        }

        if let Some(project) = &self.current_project {
            parts.push(format!("Project: {}", project.name));
        }

        if let Some(intent) = &self.user_intent {
            parts.push(format!("Intent: {}", intent));
        }

        if !self.active_files.is_empty() {
            parts.push(format!("Files: {}", self.active_files.recent(5).join(", ")));
        }

        let recent_tools = tail(&self.tool_call_chain, 10);
        if !recent_tools.is_empty() {
            let glyphs: Vec<String> = recent_tools
                .iter()
                .map(|call| format!("{}({})", call.tool, if call.success { "✓" } else { "✗" }))
                .collect();
            parts.push(format!("Tools: {}", glyphs.join(" ")));
        }

        if parts.is_empty() {
            "New session".to_string()
        } else {
            parts.join(" | ")
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tool_call(tool: &str, success: bool) -> ToolCallRecord {
        let result = if success {
            ToolResult::ok(json!("ok"))
        } else {
            ToolResult::failed("boom")
        };
        ToolCallRecord {
            timestamp: Utc::now(),
            tool: tool.to_string(),
            args: ToolArgs::Other { value: Value::Null },
            success: result.is_success(),
            result,
        }
    }

    #[test]
    fn test_new_sessions_have_unique_ids() {
        assert_ne!(Session::new().session_id, Session::new().session_id);
    }

    #[test]
    fn test_short_id() {
        let session = Session::new();
        assert_eq!(session.short_id().len(), 8);
        assert!(session.session_id.starts_with(session.short_id()));
    }

    #[test]
    fn test_staleness() {
        let mut session = Session::new();
        let now = Utc::now();
        session.last_activity = now - Duration::minutes(61);
        assert!(session.is_stale(now, Duration::hours(1)));
        session.last_activity = now - Duration::minutes(59);
        assert!(!session.is_stale(now, Duration::hours(1)));
    }

    #[test]
    fn test_active_files_dedupe_and_recent() {
        let mut files = ActiveFiles::default();
        assert!(files.insert("a.rs"));
        assert!(files.insert("b.rs"));
        assert!(!files.insert("a.rs"));
        assert_eq!(files.len(), 2);
        assert_eq!(files.recent(1), &["b.rs".to_string()]);
    }

    #[test]
    fn test_summary_for_empty_session() {
        let session = Session::new();
        assert_eq!(session.build_summary(&WorkspaceInfo::default()), "New session");
    }

    #[test]
    fn test_summary_contents() {
        let mut session = Session::new();
        session.user_intent = Some("ship the parser".to_string());
        session.current_project = Some(ProjectInfo::new("parser", "library", ""));
        for i in 0..7 {
            session.active_files.insert(format!("f{}.rs", i));
        }
        session.tool_call_chain.push(tool_call("read_file", true));
        session.tool_call_chain.push(tool_call("write_file", false));

        let workspace = WorkspaceInfo {
            project_type: Some("cargo".to_string()),
            language: Some("Rust".to_string()),
            ..Default::default()
        };
        session.refresh_summary(&workspace);

        assert_eq!(
            session.context_summary,
            "Workspace: cargo (Rust) | Project: parser | Intent: ship the parser \
             | Files: f2.rs, f3.rs, f4.rs, f5.rs, f6.rs | Tools: read_file(✓) write_file(✗)"
        );
    }
}
