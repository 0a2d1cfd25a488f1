//! Session settings
//!
//! Canvas and world dimensions plus gameplay tuning, loaded from a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{BLOCK_SIZE, GROUND_BLOCKS_HEIGHT};
use crate::tuning::Tuning;

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings file could not be read
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid JSON for `Settings`
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// Settings parsed but describe an unplayable session
    #[error("invalid settings: {reason}")]
    Invalid {
        /// What was wrong
        reason: String,
    },
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Visible play area width
    pub canvas_width: f32,
    /// Visible play area height
    pub canvas_height: f32,
    /// Climb height; the victory platform sits at `y = -world_height`
    pub world_height: f32,
    /// RNG seed for world generation (random when absent)
    pub seed: Option<u64>,
    /// Gameplay constants
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 600.0,
            world_height: 3000.0,
            seed: None,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings from a JSON file, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{} ({}), using default settings", e, path.display());
                Self::default()
            }
        }
    }

    /// Serialize settings to pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject dimensions and timings the simulation cannot work with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |reason: &str| {
            Err(SettingsError::Invalid {
                reason: reason.to_string(),
            })
        };

        if !(self.canvas_width > 0.0 && self.canvas_height > 0.0) {
            return invalid("canvas dimensions must be positive");
        }
        if !(self.world_height > 0.0) {
            return invalid("world height must be positive");
        }
        let t = &self.tuning;
        if t.max_charge_ms == 0 {
            return invalid("max charge time must be positive");
        }
        if !(t.actor_width > 0.0 && t.actor_height > 0.0) {
            return invalid("actor dimensions must be positive");
        }
        if t.actor_width > self.canvas_width {
            return invalid("actor is wider than the canvas");
        }
        if !(t.height_scale > 0.0) {
            return invalid("height scale must be positive");
        }
        if t.first_landing_bonus > t.max_health {
            return invalid("first landing bonus exceeds max health");
        }
        // The pit line is absolute, so a tall canvas can start the actor inside it
        let spawn_y = self.canvas_height - t.spawn_offset;
        let rest_y = self.canvas_height - GROUND_BLOCKS_HEIGHT as f32 * BLOCK_SIZE - t.actor_height;
        if spawn_y >= t.pit_y || rest_y >= t.pit_y {
            return invalid("canvas is too tall: the actor would spawn or stand below the pit line");
        }
        Ok(())
    }
}
