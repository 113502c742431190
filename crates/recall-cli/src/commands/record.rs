use anyhow::{Context, Result, bail};
use chrono::Utc;
use recall_core::MemoryEngine;
use recall_core::session::ProjectInfo;
use recall_core::tool::{ToolArgs, ToolResult};
use recall_core::workspace::BuildStatus;
use serde_json::Value;

pub async fn turn(engine: &mut MemoryEngine, user: String, ai: String) {
    engine.record_turn(user, ai, Vec::new()).await;
}

pub async fn tool(
    engine: &mut MemoryEngine,
    name: &str,
    args: &str,
    result: &str,
    task: Option<&str>,
) -> Result<()> {
    let args: Value = serde_json::from_str(args).context("--args is not valid JSON")?;
    let result: Value = serde_json::from_str(result).context("--result is not valid JSON")?;

    match task {
        Some(task_id) => {
            let args = ToolArgs::parse(name, args);
            let result = ToolResult::from_raw(result);
            if !engine.record_task_tool_call(task_id, name, args, result).await {
                tracing::warn!(task_id, "Tool call recorded without task link: task not found");
            }
        }
        None => engine.record_raw_tool_call(name, args, result).await,
    }
    Ok(())
}

pub async fn edit(engine: &mut MemoryEngine, path: &str, accepted: bool) {
    engine.record_edit_outcome(path, accepted).await;
}

pub async fn intent(engine: &mut MemoryEngine, text: String, goals: Vec<String>) {
    engine.set_intent(text, goals).await;
}

pub async fn project(
    engine: &mut MemoryEngine,
    name: String,
    project_type: String,
    description: String,
) {
    engine
        .set_project(ProjectInfo::new(name, project_type, description))
        .await;
}

pub async fn build(engine: &mut MemoryEngine, state: &str, message: Option<String>) -> Result<()> {
    let checked_at = Utc::now();
    let status = match state {
        "passing" => BuildStatus::Passing { checked_at },
        "failing" => BuildStatus::Failing {
            checked_at,
            message: message.unwrap_or_default(),
        },
        "unknown" => BuildStatus::Unknown,
        other => bail!("Unknown build state '{}' (expected passing, failing or unknown)", other),
    };
    engine.set_build_status(status).await;
    Ok(())
}

pub async fn issue(engine: &mut MemoryEngine, text: String) {
    if !engine.add_known_issue(text).await {
        println!("Issue already recorded.");
    }
}

pub async fn preference(engine: &mut MemoryEngine, key: String, value: String) {
    engine.set_user_preference(key, value).await;
}
