use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use fedipost_core::{ComposeSettings, Item};
use fedipost_engine::ConfigError;
use fedipost_logging::{fedipost_debug, fedipost_info};

/// Reads composition settings from a RON file; a missing file means defaults.
pub(crate) fn load_settings(path: &Path) -> Result<ComposeSettings, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fedipost_info!("No settings file at {:?}; using defaults", path);
            return Ok(ComposeSettings::default());
        }
        Err(err) => {
            return Err(ConfigError::Settings(format!(
                "failed to read {}: {err}",
                path.display()
            )))
        }
    };

    let settings: ComposeSettings = ron::from_str(&content)
        .map_err(|err| ConfigError::Settings(format!("{}: {err}", path.display())))?;
    fedipost_debug!("Loaded settings from {:?}: {:?}", path, settings);
    Ok(settings)
}

/// Reads the candidate items, a JSON array, as produced by the site build.
pub(crate) fn load_items(path: &Path) -> Result<Vec<Item>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read items from {}", path.display()))?;
    let items: Vec<Item> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse items in {}", path.display()))?;
    fedipost_debug!("Loaded {} candidate items from {:?}", items.len(), path);
    Ok(items)
}
