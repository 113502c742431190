use super::snapshot::ContextSnapshot;
use super::truncate;

const TURN_CHARS: usize = 150;
const TOOL_PREVIEW_CHARS: usize = 100;
const ACTION_DETAIL_CHARS: usize = 100;

/// Appends the rendered context sections to `base_prompt`.
///
/// Sections with nothing to say are left out. Section order is fixed.
pub fn render_prompt(base_prompt: &str, snapshot: &ContextSnapshot) -> String {
    let mut out = String::from(base_prompt);

    section(
        &mut out,
        "SESSION CONTEXT",
        format!(
            "Session {} (active for {} min)\nSummary: {}",
            snapshot.session_id, snapshot.session_minutes, snapshot.context_summary
        ),
    );

    if let Some(project) = &snapshot.current_project {
        let mut body = format!(
            "{} ({}) - {}",
            project.name, project.project_type, project.status
        );
        if !project.description.is_empty() {
            body.push('\n');
            body.push_str(&project.description);
        }
        section(&mut out, "ACTIVE PROJECT", body);
    }

    if let Some(intent) = &snapshot.user_intent {
        let mut body = intent.clone();
        for goal in &snapshot.project_goals {
            body.push_str(&format!("\n- Goal: {}", goal));
        }
        section(&mut out, "USER INTENT", body);
    }

    if !snapshot.recent_actions.is_empty() {
        let lines: Vec<String> = snapshot
            .recent_actions
            .iter()
            .map(|action| {
                let status = match action.success {
                    Some(true) => " ✓",
                    Some(false) => " ✗",
                    None => "",
                };
                let mut line = format!(
                    "- [{}] {}{}",
                    action.timestamp.format("%H:%M:%S"),
                    action.kind,
                    status
                );
                if !action.details.is_null() {
                    let details = truncate(&action.details.to_string(), ACTION_DETAIL_CHARS);
                    line.push_str(&format!(": {}", details));
                }
                line
            })
            .collect();
        section(&mut out, "RECENT ACTIONS", lines.join("\n"));
    }

    if !snapshot.recent_tool_calls.is_empty() {
        let lines: Vec<String> = snapshot
            .recent_tool_calls
            .iter()
            .map(|call| {
                format!(
                    "- {} {} {} -> {}",
                    call.tool,
                    if call.success { "✓" } else { "✗" },
                    truncate(&call.args.describe(), TOOL_PREVIEW_CHARS),
                    truncate(&call.result.preview_text(), TOOL_PREVIEW_CHARS)
                )
            })
            .collect();
        section(&mut out, "RECENT TOOL RESULTS", lines.join("\n"));
    }

    if !snapshot.active_files.is_empty() {
        let lines: Vec<String> = snapshot
            .active_files
            .iter()
            .map(|path| format!("- {}", path))
            .collect();
        section(&mut out, "ACTIVE FILES", lines.join("\n"));
    }

    if !snapshot.recent_turns.is_empty() {
        let lines: Vec<String> = snapshot
            .recent_turns
            .iter()
            .map(|turn| {
                format!(
                    "User: {}\nAssistant: {}",
                    truncate(&turn.user_message, TURN_CHARS),
                    truncate(&turn.ai_response, TURN_CHARS)
                )
            })
            .collect();
        section(&mut out, "RECENT CONVERSATION", lines.join("\n\n"));
    }

    if !snapshot.active_tasks.is_empty() {
        let progress = &snapshot.task_progress;
        let title = format!(
            "ACTIVE TASKS ({}/{} completed, {}%)",
            progress.completed, progress.total, progress.completion_rate
        );
        let lines: Vec<String> = snapshot
            .active_tasks
            .iter()
            .map(|task| {
                format!(
                    "- [{}] {} ({}, {} priority, {}%)",
                    task.status, task.description, task.task_type, task.priority, task.progress
                )
            })
            .collect();
        section(&mut out, &title, lines.join("\n"));
    } else if snapshot.task_progress.total > 0 {
        let progress = &snapshot.task_progress;
        section(
            &mut out,
            "TASK PROGRESS",
            format!(
                "{}/{} completed ({}%), no open tasks",
                progress.completed, progress.total, progress.completion_rate
            ),
        );
    }

    if !snapshot.recently_completed.is_empty() {
        let lines: Vec<String> = snapshot
            .recently_completed
            .iter()
            .map(|task| format!("- {}", task.description))
            .collect();
        section(&mut out, "RECENTLY COMPLETED", lines.join("\n"));
    }

    section(
        &mut out,
        "GUIDANCE",
        "Use this context to stay consistent with earlier work in this session. \
         Build on the active files and tasks instead of starting over, and do not \
         repeat steps that are already completed."
            .to_string(),
    );

    out
}

fn section(out: &mut String, title: &str, body: String) {
    out.push_str("\n\n## ");
    out.push_str(title);
    out.push('\n');
    out.push_str(&body);
}
