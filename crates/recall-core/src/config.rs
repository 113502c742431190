//! Engine settings.
//!
//! Every field has a default so a partial (or absent) `config.toml` is valid.

use crate::error::{RecallError, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Upper bound for `staleness_minutes` (one year).
pub const MAX_STALENESS_MINUTES: i64 = 60 * 24 * 365;

/// Tunables for the memory engine.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MemorySettings {
    /// Age (from `last_activity`) after which a session snapshot is not restored.
    #[serde(default = "default_staleness_minutes")]
    pub staleness_minutes: i64,
    #[serde(default = "default_max_history")]
    pub max_history: usize,
    #[serde(default = "default_max_tool_calls")]
    pub max_tool_calls: usize,
    #[serde(default = "default_max_actions")]
    pub max_actions: usize,
    #[serde(default = "default_max_completed_tasks")]
    pub max_completed_tasks: usize,
    #[serde(default = "default_max_recent_edits")]
    pub max_recent_edits: usize,
}

fn default_staleness_minutes() -> i64 {
    60
}

fn default_max_history() -> usize {
    100
}

fn default_max_tool_calls() -> usize {
    200
}

fn default_max_actions() -> usize {
    50
}

fn default_max_completed_tasks() -> usize {
    50
}

fn default_max_recent_edits() -> usize {
    20
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self {
            staleness_minutes: default_staleness_minutes(),
            max_history: default_max_history(),
            max_tool_calls: default_max_tool_calls(),
            max_actions: default_max_actions(),
            max_completed_tasks: default_max_completed_tasks(),
            max_recent_edits: default_max_recent_edits(),
        }
    }
}

impl MemorySettings {
    /// The staleness threshold as a duration, clamped to
    /// `1..=MAX_STALENESS_MINUTES` minutes.
    pub fn staleness_threshold(&self) -> Duration {
        Duration::minutes(self.staleness_minutes.clamp(1, MAX_STALENESS_MINUTES))
    }

    /// Rejects values the engine cannot honor.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_STALENESS_MINUTES).contains(&self.staleness_minutes) {
            return Err(RecallError::config(format!(
                "staleness_minutes must be between 1 and {}, got {}",
                MAX_STALENESS_MINUTES, self.staleness_minutes
            )));
        }

        let caps = [
            ("max_history", self.max_history),
            ("max_tool_calls", self.max_tool_calls),
            ("max_actions", self.max_actions),
            ("max_completed_tasks", self.max_completed_tasks),
            ("max_recent_edits", self.max_recent_edits),
        ];
        if let Some((name, _)) = caps.iter().find(|(_, cap)| *cap == 0) {
            return Err(RecallError::config(format!("{} must be at least 1", name)));
        }
        Ok(())
    }
}
