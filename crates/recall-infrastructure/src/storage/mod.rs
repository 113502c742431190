//! Storage layer: atomic snapshot files and the config file.

mod atomic_file;
mod config_storage;

pub use atomic_file::{AtomicFileError, AtomicJsonFile};
pub use config_storage::{load_settings, load_settings_or_default};
