use anyhow::Result;
use clap::{Parser, Subcommand};
use recall_core::task::{TaskPriority, TaskStatus, TaskType};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "recall")]
#[command(about = "Session and task memory for coding assistants", long_about = None)]
struct Cli {
    /// Data directory (defaults to $RECALL_HOME, then ~/.recall)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the enhanced system prompt for the current state
    Context {
        /// Base prompt the context block is appended to
        #[arg(long, default_value = "")]
        base: String,
        /// Print the structured snapshot as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// List current and recently completed tasks
    Tasks,
    /// Create a task
    AddTask {
        description: String,
        #[arg(long, default_value = "medium")]
        priority: TaskPriority,
        #[arg(long = "type", default_value = "general")]
        task_type: TaskType,
        /// Create as a subtask of this task
        #[arg(long)]
        parent: Option<String>,
    },
    /// Update a task's status, progress or description
    Update {
        id: String,
        #[arg(long)]
        status: Option<TaskStatus>,
        #[arg(long)]
        progress: Option<u8>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<TaskPriority>,
    },
    /// Mark a task completed
    Complete {
        id: String,
        #[arg(long)]
        result: Option<String>,
    },
    /// Cancel a task
    Cancel { id: String },
    /// Attach a note to a task
    Note { id: String, text: String },
    /// Detect tasks in free text and register them
    Detect { text: String },
    /// Record a conversation turn
    Turn {
        #[arg(long)]
        user: String,
        #[arg(long)]
        ai: String,
    },
    /// Record a tool call (args and result as JSON)
    Tool {
        name: String,
        #[arg(long, default_value = "{}")]
        args: String,
        #[arg(long, default_value = "{}")]
        result: String,
        /// Correlate the call with a task
        #[arg(long)]
        task: Option<String>,
    },
    /// Record the outcome of a reviewed file edit
    Edit {
        path: String,
        #[arg(long)]
        rejected: bool,
    },
    /// Set the user's intent and goals
    Intent {
        text: String,
        #[arg(long = "goal")]
        goals: Vec<String>,
    },
    /// Set the active project
    Project {
        name: String,
        #[arg(long = "type", default_value = "general")]
        project_type: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Record the last build result (passing, failing or unknown)
    Build {
        state: String,
        #[arg(long)]
        message: Option<String>,
    },
    /// Record a known issue in the workspace
    Issue { text: String },
    /// Store a user preference
    Pref { key: String, value: String },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("RECALL_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let mut engine = commands::open_engine(cli.data_dir.as_deref()).await?;

    match cli.command {
        Commands::Context { base, json } => commands::context::show(&engine, &base, json)?,
        Commands::Tasks => commands::tasks::list(&engine),
        Commands::AddTask {
            description,
            priority,
            task_type,
            parent,
        } => commands::tasks::add(&mut engine, description, priority, task_type, parent).await?,
        Commands::Update {
            id,
            status,
            progress,
            description,
            priority,
        } => {
            commands::tasks::update(&mut engine, &id, status, progress, description, priority)
                .await?
        }
        Commands::Complete { id, result } => {
            commands::tasks::complete(&mut engine, &id, result).await?
        }
        Commands::Cancel { id } => commands::tasks::cancel(&mut engine, &id).await?,
        Commands::Note { id, text } => commands::tasks::note(&mut engine, &id, text).await?,
        Commands::Detect { text } => commands::tasks::detect(&mut engine, &text).await,
        Commands::Turn { user, ai } => commands::record::turn(&mut engine, user, ai).await,
        Commands::Tool {
            name,
            args,
            result,
            task,
        } => commands::record::tool(&mut engine, &name, &args, &result, task.as_deref()).await?,
        Commands::Edit { path, rejected } => {
            commands::record::edit(&mut engine, &path, !rejected).await
        }
        Commands::Intent { text, goals } => {
            commands::record::intent(&mut engine, text, goals).await
        }
        Commands::Project {
            name,
            project_type,
            description,
        } => commands::record::project(&mut engine, name, project_type, description).await,
        Commands::Build { state, message } => {
            commands::record::build(&mut engine, &state, message).await?
        }
        Commands::Issue { text } => commands::record::issue(&mut engine, text).await,
        Commands::Pref { key, value } => {
            commands::record::preference(&mut engine, key, value).await
        }
    }

    Ok(())
}
