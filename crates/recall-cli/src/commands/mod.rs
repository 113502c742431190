pub mod context;
pub mod record;
pub mod tasks;

use anyhow::{Context, Result};
use recall_core::MemoryEngine;
use recall_infrastructure::storage::load_settings_or_default;
use recall_infrastructure::{JsonSnapshotRepository, RecallPaths, TracingTelemetry};
use std::path::Path;
use std::sync::Arc;

/// Resolves the data directory, loads `config.toml` and opens the engine.
pub async fn open_engine(data_dir: Option<&Path>) -> Result<MemoryEngine> {
    let paths = RecallPaths::resolve(data_dir).context("Failed to resolve data directory")?;
    tracing::debug!(data_dir = %paths.data_dir().display(), "Opening memory store");

    let settings = load_settings_or_default(&paths.config_file());
    let repository = Arc::new(JsonSnapshotRepository::new(&paths));

    Ok(MemoryEngine::open(repository, None, Arc::new(TracingTelemetry), settings).await)
}
