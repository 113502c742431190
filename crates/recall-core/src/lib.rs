//! Session and task memory for a coding assistant.
//!
//! The engine records conversation turns, tool calls and user intent, tracks
//! tasks derived from that intent, persists everything after each mutation and
//! renders a bounded context block for the next model prompt.

pub mod bounded;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod repository;
pub mod session;
pub mod task;
pub mod tool;
pub mod workspace;

pub use config::MemorySettings;
pub use engine::MemoryEngine;
pub use error::{RecallError, Result};
pub use repository::{MemorySnapshotRepository, SnapshotRepository};
