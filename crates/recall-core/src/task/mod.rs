//! Task domain module.
//!
//! # Module Structure
//!
//! - `model`: [`Task`] and its value types (`TaskStatus`, `TaskType`, ...)
//! - `registry`: [`TaskRegistry`], the lifecycle owner of open and archived tasks
//! - `detector`: keyword-based task detection from user input
//! - `telemetry`: the [`TaskTelemetry`] sink and its no-op implementation

pub mod detector;
mod model;
mod registry;
mod telemetry;

pub use detector::{TaskCandidate, detect_tasks};
pub use model::{
    Task, TaskNote, TaskPriority, TaskProgress, TaskStatus, TaskType, TaskUpdate, ToolUse,
};
pub use registry::TaskRegistry;
pub use telemetry::{NoopTelemetry, TaskTelemetry};
