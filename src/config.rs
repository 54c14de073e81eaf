// src/config.rs

//! Configuration loading utilities.
//!
//! This module provides convenience functions for loading configuration
//! and the location table from files and the environment.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::{Config, LocationTable};

/// Load configuration from a TOML file and apply environment overrides.
///
/// A missing or unreadable file falls back to defaults; the result is
/// validated either way.
pub fn load_config(path: &Path) -> Result<Config> {
    let config = Config::load_or_default(path).with_overrides(|key| std::env::var(key).ok());
    config
        .validate()
        .map_err(|e| AppError::config(format!("Invalid configuration: {e}")))?;
    Ok(config)
}

/// Load the location table named by the configuration, or the bundled one.
pub fn load_locations(config: &Config) -> Result<LocationTable> {
    match &config.paths.locations_file {
        Some(path) => {
            log::debug!("Loading location table from {path}");
            LocationTable::load(path)
        }
        None => LocationTable::bundled(),
    }
}

/// Load and validate both the configuration and the location table.
pub fn load_all(path: &Path) -> Result<(Config, LocationTable)> {
    let config = load_config(path)?;
    let locations = load_locations(&config)?;
    if locations.is_empty() {
        return Err(AppError::config("Location table has no divisions"));
    }
    Ok((config, locations))
}
