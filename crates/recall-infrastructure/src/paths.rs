//! Path resolution for the recall data directory.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.recall/              # Data directory (or $RECALL_HOME)
//! ├── config.toml         # MemorySettings overrides
//! ├── session.json        # Session snapshot
//! └── workspace.json      # Workspace snapshot (tasks, edits, preferences)
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding the data directory.
pub const RECALL_HOME_ENV: &str = "RECALL_HOME";

const DEFAULT_DIR_NAME: &str = ".recall";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("Cannot find home directory")]
    HomeDirNotFound,
}

/// Resolved locations of every file the engine reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecallPaths {
    data_dir: PathBuf,
}

impl RecallPaths {
    /// Uses `dir` as the data directory.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: dir.into(),
        }
    }

    /// Resolves the data directory.
    ///
    /// Precedence: `explicit`, then `$RECALL_HOME`, then `~/.recall`.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, PathError> {
        if let Some(dir) = explicit {
            return Ok(Self::at(dir));
        }
        if let Some(dir) = std::env::var_os(RECALL_HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::at(dir));
        }
        let home = dirs::home_dir().ok_or(PathError::HomeDirNotFound)?;
        Ok(Self::at(home.join(DEFAULT_DIR_NAME)))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn session_file(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }

    pub fn workspace_file(&self) -> PathBuf {
        self.data_dir.join("workspace.json")
    }

    pub fn config_file(&self) -> PathBuf {
        self.data_dir.join("config.toml")
    }
}
