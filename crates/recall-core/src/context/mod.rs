//! Context assembly for prompt injection.
//!
//! [`ContextSnapshot`] is the structured, size-bounded view of memory;
//! [`render_prompt`] turns it into prose sections appended to a base prompt.

mod render;
mod snapshot;

pub use render::render_prompt;
pub use snapshot::{ContextSnapshot, TaskBrief};

/// Cuts `text` to `max_chars` characters, marking the cut with `...`.
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
