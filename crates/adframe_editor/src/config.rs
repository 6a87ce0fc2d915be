// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor configuration.
//!
//! Stored as RON next to the project. A missing file means defaults; a file
//! that exists but does not parse is an error.

use crate::error::EditorError;
use adframe_timeline::{DEFAULT_TRACK_DURATION, NOMINAL_TRACK_WIDTH};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default undo depth
pub const DEFAULT_HISTORY_DEPTH: usize = 100;

/// Editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Track length for new projects, in seconds
    pub track_duration: f32,
    /// Track width used before the host measures one, in pixels
    pub nominal_track_width: f32,
    /// Cadence of the threaded tick driver
    pub tick_interval_ms: u64,
    /// Delay of GIF frames created on first touch
    pub default_gif_delay: f32,
    /// Recompute link groups when a project is loaded
    pub auto_link_on_load: bool,
    /// Number of undo steps kept
    pub history_depth: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            track_duration: DEFAULT_TRACK_DURATION,
            nominal_track_width: NOMINAL_TRACK_WIDTH,
            tick_interval_ms: 16,
            default_gif_delay: 0.0,
            auto_link_on_load: true,
            history_depth: DEFAULT_HISTORY_DEPTH,
        }
    }
}

impl EditorConfig {
    /// Load from a RON file, falling back to defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self, EditorError> {
        if !path.exists() {
            tracing::info!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: EditorConfig = ron::from_str(&content)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Save as pretty RON
    pub fn save(&self, path: &Path) -> Result<(), EditorError> {
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Tick driver interval
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}
