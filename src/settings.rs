//! Player preferences
//!
//! Persisted separately from high scores in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_LEVEL_PATH;
use crate::platform::storage;
use crate::tuning::Tuning;

/// Player settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0), applied to the intro video
    pub music_volume: f32,
    pub muted: bool,

    // === Debug ===
    /// Draw the ship's collision volume
    pub show_collision_volume: bool,

    // === Controls ===
    /// Multiplier on pointer steering sensitivity
    pub steer_scale: f32,

    /// Level document fetched at boot and on every reset
    pub level_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,

            show_collision_volume: false,

            steer_scale: 1.0,

            level_path: DEFAULT_LEVEL_PATH.to_string(),
        }
    }
}

impl Settings {
    /// Game balance with the player's steering preference applied
    pub fn tuning(&self) -> Tuning {
        Tuning::default().with_steer_scale(self.steer_scale)
    }

    /// Volume for the intro video element
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.music_volume).clamp(0.0, 1.0)
        }
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "tie_run_settings";

    /// Stored settings, or defaults when none are readable
    pub fn load() -> Self {
        storage::load_json(Self::STORAGE_KEY).unwrap_or_else(|| {
            log::info!("Using default settings");
            Self::default()
        })
    }

    pub fn save(&self) {
        if storage::save_json(Self::STORAGE_KEY, self) {
            log::info!("Settings saved");
        }
    }
}
