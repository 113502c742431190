//! Task telemetry emitted as structured `tracing` events.

use recall_core::task::{TaskPriority, TaskTelemetry, TaskType};

/// Target used for every telemetry event, so it can be filtered separately
/// (e.g. `RECALL_LOG=recall::telemetry=info`).
pub const TELEMETRY_TARGET: &str = "recall::telemetry";

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetry;

impl TaskTelemetry for TracingTelemetry {
    fn record_task_creation(
        &self,
        task_id: &str,
        task_type: TaskType,
        priority: TaskPriority,
        description: &str,
    ) {
        tracing::info!(
            target: TELEMETRY_TARGET,
            task_id,
            task_type = %task_type,
            priority = %priority,
            description,
            "task_created"
        );
    }

    fn record_task_completion(
        &self,
        task_id: &str,
        task_type: TaskType,
        duration_minutes: i64,
        success: bool,
        result: Option<&str>,
    ) {
        tracing::info!(
            target: TELEMETRY_TARGET,
            task_id,
            task_type = %task_type,
            duration_minutes,
            success,
            result = result.unwrap_or(""),
            "task_finished"
        );
    }
}
