//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: the [`Session`] record and its entries (turns, tool calls, actions)
//! - `restore`: the restore-or-fresh decision and [`RestoreDiagnostic`]
//! - `store`: [`SessionStore`], the write-through owner of the live session

mod model;
mod restore;
mod store;

pub use model::{ActionRecord, ActiveFiles, ConversationTurn, ProjectInfo, Session, ToolCallRecord};
pub use restore::{RestoreDiagnostic, restore_session};
pub use store::{RestoreFallback, SessionStore};
