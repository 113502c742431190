use chrono::{Duration, Utc};
use recall_core::task::{NoopTelemetry, TaskPriority, TaskType};
use recall_core::{MemoryEngine, MemorySettings, SnapshotRepository};
use recall_infrastructure::storage::load_settings;
use recall_infrastructure::{JsonSnapshotRepository, RecallPaths, TracingTelemetry};
use serde_json::json;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

async fn open(paths: &RecallPaths) -> MemoryEngine {
    MemoryEngine::open(
        Arc::new(JsonSnapshotRepository::new(paths)),
        None,
        Arc::new(TracingTelemetry),
        MemorySettings::default(),
    )
    .await
}

#[tokio::test]
async fn test_engine_state_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let paths = RecallPaths::at(temp_dir.path());

    let (session_id, task_id) = {
        let mut engine = open(&paths).await;
        engine.record_turn("add a cache", "Sure.", Vec::new()).await;
        engine
            .record_raw_tool_call(
                "write_file",
                json!({"path": "src/cache.rs", "content": "pub struct Cache;"}),
                json!({"bytes": 17}),
            )
            .await;
        let id = engine
            .create_task("Implement the cache", TaskPriority::High, TaskType::Coding, None)
            .await;
        (engine.session().session_id.clone(), id)
    };

    assert!(paths.session_file().exists());
    assert!(paths.workspace_file().exists());

    let engine = open(&paths).await;
    assert_eq!(engine.session().session_id, session_id);
    assert!(engine.session().active_files.contains("src/cache.rs"));
    assert_eq!(engine.session().tool_call_chain.len(), 1);
    assert!(engine.tasks().get(&task_id).is_some());
}

#[tokio::test]
async fn test_stale_session_file_starts_fresh() {
    let temp_dir = TempDir::new().unwrap();
    let paths = RecallPaths::at(temp_dir.path());
    let repo = JsonSnapshotRepository::new(&paths);

    let stale_id = {
        let mut engine = open(&paths).await;
        engine.record_turn("hi", "hello", Vec::new()).await;
        engine.session().session_id.clone()
    };

    let mut session = repo.load_session().await.unwrap().unwrap();
    session.last_activity = Utc::now() - Duration::hours(2);
    repo.save_session(&session).await.unwrap();

    let engine = open(&paths).await;
    assert_ne!(engine.session().session_id, stale_id);
    assert!(engine.session().conversation_history.is_empty());
}

#[tokio::test]
async fn test_corrupt_snapshots_fall_back_to_empty_state() {
    let temp_dir = TempDir::new().unwrap();
    let paths = RecallPaths::at(temp_dir.path());
    fs::write(paths.session_file(), "not json").unwrap();
    fs::write(paths.workspace_file(), "{\"current_tasks\": 7}").unwrap();

    let mut engine = open(&paths).await;
    assert!(engine.session().conversation_history.is_empty());
    assert!(engine.tasks().current_tasks().is_empty());

    // The next mutation overwrites the corrupt file with a valid snapshot.
    engine.record_turn("u", "a", Vec::new()).await;
    let repo = JsonSnapshotRepository::new(&paths);
    assert_eq!(
        repo.load_session().await.unwrap().unwrap().session_id,
        engine.session().session_id
    );
}

#[test]
fn test_config_file_overrides_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let paths = RecallPaths::at(temp_dir.path());
    fs::write(paths.config_file(), "staleness_minutes = 15\nmax_history = 10\n").unwrap();

    let settings = load_settings(&paths.config_file()).unwrap();
    assert_eq!(settings.staleness_minutes, 15);
    assert_eq!(settings.max_history, 10);
    assert_eq!(settings.max_actions, MemorySettings::default().max_actions);
}
