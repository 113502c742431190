use anyhow::{Result, bail};
use recall_core::MemoryEngine;
use recall_core::task::{Task, TaskPriority, TaskStatus, TaskType, TaskUpdate};

fn print_task(task: &Task) {
    println!(
        "{}  [{}] {} ({}, {} priority, {}%)",
        task.id, task.status, task.description, task.task_type, task.priority, task.progress
    );
}

pub fn list(engine: &MemoryEngine) {
    let tasks = engine.tasks();
    let progress = engine.task_progress();

    println!(
        "Tasks: {}/{} completed ({}%), {} in progress, {} pending, {} blocked, {} cancelled",
        progress.completed,
        progress.total,
        progress.completion_rate,
        progress.in_progress,
        progress.pending,
        progress.blocked,
        progress.cancelled
    );

    if tasks.current_tasks().is_empty() {
        println!("\nNo open tasks.");
    } else {
        println!("\nOpen:");
        for task in tasks.current_tasks() {
            print_task(task);
        }
    }

    let finished = tasks.completed_tasks();
    if !finished.is_empty() {
        println!("\nFinished (latest 10):");
        for task in finished.iter().rev().take(10) {
            print_task(task);
        }
    }
}

pub async fn add(
    engine: &mut MemoryEngine,
    description: String,
    priority: TaskPriority,
    task_type: TaskType,
    parent: Option<String>,
) -> Result<()> {
    let id = match parent {
        Some(parent_id) => match engine.add_subtask(&parent_id, description, priority).await {
            Some(id) => id,
            None => bail!("No open task with id '{}'", parent_id),
        },
        None => engine.create_task(description, priority, task_type, None).await,
    };
    println!("{}", id);
    Ok(())
}

pub async fn update(
    engine: &mut MemoryEngine,
    id: &str,
    status: Option<TaskStatus>,
    progress: Option<u8>,
    description: Option<String>,
    priority: Option<TaskPriority>,
) -> Result<()> {
    let update = TaskUpdate {
        status,
        progress,
        description,
        priority,
        ..Default::default()
    };
    if !engine.update_task(id, update).await {
        bail!("Task '{}' not found or update not allowed", id);
    }
    if let Some(task) = engine.tasks().get(id) {
        print_task(task);
    }
    Ok(())
}

pub async fn complete(engine: &mut MemoryEngine, id: &str, result: Option<String>) -> Result<()> {
    if !engine.complete_task(id, result).await {
        bail!("No open task with id '{}'", id);
    }
    println!("Completed {}", id);
    Ok(())
}

pub async fn cancel(engine: &mut MemoryEngine, id: &str) -> Result<()> {
    if !engine.cancel_task(id).await {
        bail!("No open task with id '{}'", id);
    }
    println!("Cancelled {}", id);
    Ok(())
}

pub async fn note(engine: &mut MemoryEngine, id: &str, text: String) -> Result<()> {
    if !engine.add_note(id, text).await {
        bail!("Task '{}' not found", id);
    }
    Ok(())
}

pub async fn detect(engine: &mut MemoryEngine, text: &str) {
    let ids = engine.process_user_input(text).await;
    if ids.is_empty() {
        println!("No tasks detected.");
        return;
    }
    for id in ids {
        if let Some(task) = engine.tasks().get(&id) {
            print_task(task);
        }
    }
}
