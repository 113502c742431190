//! Restore-or-fresh decision for the session snapshot.

use super::model::Session;
use crate::error::{RecallError, Result};
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

/// Why a stored session was not restored.
///
/// None of these are failures for the caller: each one means "start with a
/// fresh session". They exist so the embedding application can log them.
#[derive(Error, Debug, Clone)]
pub enum RestoreDiagnostic {
    #[error("no session snapshot found")]
    NoSnapshot,

    #[error("session snapshot could not be loaded: {0}")]
    Unreadable(RecallError),

    #[error("session snapshot is stale (last activity {last_activity}, {age_minutes} min ago)")]
    Stale {
        last_activity: DateTime<Utc>,
        age_minutes: i64,
    },
}

impl RestoreDiagnostic {
    /// `NoSnapshot` is the normal cold-start path; the others deserve a warning.
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::NoSnapshot)
    }
}

/// Decides whether a loaded snapshot can be resumed at `now`.
pub fn restore_session(
    loaded: Result<Option<Session>>,
    now: DateTime<Utc>,
    threshold: Duration,
) -> std::result::Result<Session, RestoreDiagnostic> {
    let session = match loaded {
        Ok(Some(session)) => session,
        Ok(None) => return Err(RestoreDiagnostic::NoSnapshot),
        Err(err) => return Err(RestoreDiagnostic::Unreadable(err)),
    };

    if session.is_stale(now, threshold) {
        return Err(RestoreDiagnostic::Stale {
            last_activity: session.last_activity,
            age_minutes: session.idle_for(now).num_minutes(),
        });
    }

    Ok(session)
}
