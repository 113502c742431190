//! `config.toml` loading.

use recall_core::MemorySettings;
use recall_core::error::Result;
use std::fs;
use std::path::Path;

/// Reads engine settings from a TOML file.
///
/// A missing or blank file yields defaults.
pub fn load_settings(path: &Path) -> Result<MemorySettings> {
    if !path.exists() {
        return Ok(MemorySettings::default());
    }

    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(MemorySettings::default());
    }

    let settings: MemorySettings = toml::from_str(&content)?;
    settings.validate()?;
    Ok(settings)
}

/// Like [`load_settings`], but a malformed file is logged and replaced by defaults.
pub fn load_settings_or_default(path: &Path) -> MemorySettings {
    load_settings(path).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Ignoring invalid config file");
        MemorySettings::default()
    })
}
