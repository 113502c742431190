//! Versioned envelope for on-disk snapshots.
//!
//! Every snapshot file is the domain document flattened next to a `version`
//! field. Readers accept any version with the same MAJOR number; additive
//! MINOR changes are absorbed by serde defaults on the domain types.
//!
//! ### Version History
//! - **1.0.0**: Initial session/workspace snapshot layout

use recall_core::error::{RecallError, Result};
use serde::{Deserialize, Serialize};

/// Current snapshot schema version.
pub const SNAPSHOT_VERSION: &str = "1.0.0";

/// Write-side envelope borrowing the domain value.
#[derive(Debug, Serialize)]
pub struct VersionedSnapshotRef<'a, T: Serialize> {
    pub version: &'a str,
    #[serde(flatten)]
    pub data: &'a T,
}

/// Read-side envelope.
#[derive(Debug, Deserialize)]
pub struct VersionedSnapshot<T> {
    #[serde(default = "legacy_version")]
    pub version: String,
    #[serde(flatten)]
    pub data: T,
}

fn legacy_version() -> String {
    SNAPSHOT_VERSION.to_string()
}

impl<T> VersionedSnapshot<T> {
    /// Unwraps the domain value, rejecting snapshots from another major version.
    pub fn into_domain(self) -> Result<T> {
        if major(&self.version) != major(SNAPSHOT_VERSION) {
            return Err(RecallError::Serialization {
                format: "JSON".to_string(),
                message: format!(
                    "unsupported snapshot version {} (expected {}.x)",
                    self.version,
                    major(SNAPSHOT_VERSION)
                ),
            });
        }
        Ok(self.data)
    }
}

/// Serializes `data` as a pretty-printed snapshot at the current version.
pub fn encode<T: Serialize>(data: &T) -> Result<Vec<u8>> {
    let envelope = VersionedSnapshotRef {
        version: SNAPSHOT_VERSION,
        data,
    };
    Ok(serde_json::to_vec_pretty(&envelope)?)
}

fn major(version: &str) -> &str {
    version.split('.').next().unwrap_or(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_core::session::Session;

    #[test]
    fn test_encoded_snapshot_carries_version() {
        let session = Session::new();
        let bytes = encode(&session).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["version"], SNAPSHOT_VERSION);
        assert_eq!(value["session_id"], session.session_id.as_str());
    }

    #[test]
    fn test_decode_current_version() {
        let session = Session::new();
        let bytes = encode(&session).unwrap();
        let snapshot: VersionedSnapshot<Session> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(snapshot.into_domain().unwrap().session_id, session.session_id);
    }

    #[test]
    fn test_rejects_other_major_version() {
        let session = Session::new();
        let mut value = serde_json::to_value(&session).unwrap();
        value["version"] = serde_json::json!("2.0.0");

        let snapshot: VersionedSnapshot<Session> = serde_json::from_value(value).unwrap();
        assert!(snapshot.into_domain().unwrap_err().is_serialization());
    }

    #[test]
    fn test_missing_version_is_treated_as_current() {
        let session = Session::new();
        let value = serde_json::to_value(&session).unwrap();
        let snapshot: VersionedSnapshot<Session> = serde_json::from_value(value).unwrap();
        assert!(snapshot.into_domain().is_ok());
    }
}
