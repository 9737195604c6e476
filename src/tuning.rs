//! Data-driven game balance
//!
//! Defaults mirror `crate::consts`; hosts and tests override individual
//! fields without touching the constants.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::CanalBounds;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub proximity_threshold: f32,
    pub fly_speed: f32,
    pub steer_sensitivity: f32,
    pub bounds: CanalBounds,
    pub rotation_decay: f32,
    pub max_tilt: f32,
    pub wall_damage: f32,
    pub health_pickup: f32,
    pub pickup_score: f32,
    pub invincibility_ms: f64,
    pub invincible_opacity: f32,
    pub asteroid_speed: f32,
    pub asteroid_bound: f32,
    pub powerup_spin: f32,
    pub max_level_retries: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            proximity_threshold: PROXIMITY_THRESHOLD,
            fly_speed: FLY_SPEED,
            steer_sensitivity: STEER_SENSITIVITY,
            bounds: CanalBounds::default(),
            rotation_decay: ROTATION_DECAY,
            max_tilt: MAX_TILT,
            wall_damage: WALL_DAMAGE,
            health_pickup: HEALTH_PICKUP,
            pickup_score: PICKUP_SCORE,
            invincibility_ms: INVINCIBILITY_MS,
            invincible_opacity: INVINCIBLE_OPACITY,
            asteroid_speed: ASTEROID_SPEED,
            asteroid_bound: ASTEROID_BOUND,
            powerup_spin: POWERUP_SPIN,
            max_level_retries: MAX_LEVEL_RETRIES,
        }
    }
}

impl Tuning {
    /// Apply the player's steering preference on top of the base sensitivity
    pub fn with_steer_scale(mut self, scale: f32) -> Self {
        self.steer_sensitivity = STEER_SENSITIVITY * scale.clamp(0.25, 4.0);
        self
    }
}
