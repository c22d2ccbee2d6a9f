//! Reading and writing `config.yaml`.
//!
//! Loading never fails: a missing file is replaced by the defaults (which are
//! written straight away) and an unreadable file falls back to the defaults
//! with a warning.

use super::format::{parse, serialize};
use super::schema::{CONFIG_FILE, InfoConfig};
use crate::Result;
use std::fs;
use std::path::Path;

/// Load the page file from `data_dir`, creating it with defaults if absent.
pub fn load(data_dir: &Path) -> InfoConfig {
    let path = data_dir.join(CONFIG_FILE);
    if let Err(e) = fs::create_dir_all(data_dir) {
        tracing::warn!("Could not create data directory {}: {}", data_dir.display(), e);
    }

    if !path.exists() {
        let defaults = InfoConfig::defaults(data_dir);
        tracing::info!("No {} found, writing defaults", path.display());
        save(&defaults);
        return defaults;
    }

    match fs::read_to_string(&path) {
        Ok(text) => {
            let config = parse(&text, data_dir);
            tracing::info!(
                "Loaded {} with {} info lines",
                path.display(),
                config.line_count()
            );
            config
        }
        Err(e) => {
            tracing::warn!("Failed to read {}, using defaults: {}", path.display(), e);
            InfoConfig::defaults(data_dir)
        }
    }
}

/// Write the page file, logging and skipping on failure.
pub fn save(config: &InfoConfig) {
    if let Err(e) = try_save(config) {
        tracing::warn!("Could not write {}: {}", config.config_path().display(), e);
    }
}

/// Write the page file, reporting failures to the caller.
pub fn try_save(config: &InfoConfig) -> Result<()> {
    let path = config.config_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, serialize(config))?;
    Ok(())
}
