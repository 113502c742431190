//! File-system infrastructure for the recall memory engine.
//!
//! - [`JsonSnapshotRepository`]: atomic JSON snapshots under the data directory
//! - [`RecallPaths`]: data directory resolution
//! - [`storage`]: atomic file writes and `config.toml` loading
//! - [`TracingTelemetry`]: task telemetry as `tracing` events

pub mod dto;
pub mod json_snapshot_repository;
pub mod paths;
pub mod storage;
pub mod telemetry;

pub use json_snapshot_repository::JsonSnapshotRepository;
pub use paths::{PathError, RecallPaths};
pub use telemetry::TracingTelemetry;
