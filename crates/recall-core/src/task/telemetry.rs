//! Telemetry sink for task lifecycle events.

use super::model::{TaskPriority, TaskType};

/// Receives task creation and completion events.
///
/// Implementations must not block; the registry calls them inline.
pub trait TaskTelemetry: Send + Sync {
    fn record_task_creation(
        &self,
        task_id: &str,
        task_type: TaskType,
        priority: TaskPriority,
        description: &str,
    );

    fn record_task_completion(
        &self,
        task_id: &str,
        task_type: TaskType,
        duration_minutes: i64,
        success: bool,
        result: Option<&str>,
    );
}

/// Telemetry that discards every event.
pub struct NoopTelemetry;

impl TaskTelemetry for NoopTelemetry {
    fn record_task_creation(&self, _: &str, _: TaskType, _: TaskPriority, _: &str) {}

    fn record_task_completion(&self, _: &str, _: TaskType, _: i64, _: bool, _: Option<&str>) {}
}
