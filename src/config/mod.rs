// SPDX-License-Identifier: MPL-2.0
//! This module handles the crate's configuration, including loading and saving
//! viewer preferences to a `settings.toml` file.
//!
//! The configuration covers display preferences only (playback rate, repeat
//! flag, contrast defaults); movie data itself is never persisted.
//!
//! # Examples
//!
//! ```no_run
//! use stack_lens::config::{self, Config};
//!
//! // Load existing configuration
//! let mut config = config::load().unwrap_or_default();
//!
//! // Modify a setting
//! config.playback_fps = Some(24.0);
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::contrast::ContrastRequest;
use crate::error::Result;
use crate::playback::PlaybackFps;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "StackLens";

/// Persisted viewer preferences.
///
/// Every field is optional so that settings files written by older versions
/// keep loading; absent fields fall back to the constants in [`defaults`].
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub playback_fps: Option<f64>,
    #[serde(default)]
    pub repeat: Option<bool>,
    #[serde(default)]
    pub contrast_index: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            playback_fps: Some(DEFAULT_PLAYBACK_FPS),
            repeat: Some(false),
            contrast_index: Some(DEFAULT_CONTRAST_INDEX),
        }
    }
}

impl Config {
    /// Returns the configured playback rate, clamped into the valid range.
    #[must_use]
    pub fn initial_fps(&self) -> PlaybackFps {
        self.playback_fps
            .map(PlaybackFps::new)
            .unwrap_or_default()
    }

    /// Returns the configured repeat flag.
    #[must_use]
    pub fn initial_repeat(&self) -> bool {
        self.repeat.unwrap_or(false)
    }

    /// Returns the contrast request applied on load when the caller gives none.
    #[must_use]
    pub fn initial_contrast(&self) -> ContrastRequest {
        ContrastRequest::Index(self.contrast_index.unwrap_or(DEFAULT_CONTRAST_INDEX))
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content).unwrap_or_default())
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
