//! TIE Run - corridor-flight arcade game core
//!
//! Core modules:
//! - `sim`: Per-tick game core (motion, proximity index, collisions, run state)
//! - `level`: Level catalog decoding
//! - `platform`: Host collaborators (headless native, browser)
//! - `settings`: Player preferences
//! - `tuning`: Data-driven game balance
//! - `highscores`: Best-runs leaderboard

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod error;
pub mod highscores;
pub mod level;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::GameError;
pub use highscores::HighScores;
pub use level::LevelCatalog;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Entities closer than this to the ship are collision candidates
    pub const PROXIMITY_THRESHOLD: f32 = 30.0;

    /// Forward advance per tick while moving (not time-scaled)
    pub const FLY_SPEED: f32 = 0.1;
    /// Lateral/vertical units per tick per pixel of pointer offset
    pub const STEER_SENSITIVITY: f32 = 0.0002;

    /// Canal bounds
    pub const CANAL_X_MIN: f32 = -40.0;
    pub const CANAL_X_MAX: f32 = 40.0;
    pub const CANAL_Y_MAX: f32 = 40.0;
    /// Ground plane: the ship never drops below this
    pub const GROUND_Y: f32 = -2.0;

    /// Roll/pitch returned toward neutral per tick
    pub const ROTATION_DECAY: f32 = 0.0008;
    /// Roll/pitch magnitude cap (radians)
    pub const MAX_TILT: f32 = 0.5;
    /// Roll/pitch added by a single steering key press
    pub const KEY_TILT: f32 = 0.005;
    /// Lateral offset applied by a single steering key press
    pub const KEY_NUDGE: f32 = 0.2;
    /// Camera yaw/pitch step for the debug camera keys
    pub const CAMERA_STEP: f32 = 0.5;

    /// Health lost per tick while pressed against a wall
    pub const WALL_DAMAGE: f32 = 0.25;
    pub const MAX_HEALTH: f32 = 100.0;
    /// Health restored by a health powerup
    pub const HEALTH_PICKUP: f32 = 0.5;
    /// Score awarded by any powerup
    pub const PICKUP_SCORE: f32 = 10.0;

    /// Invincibility lasts this long after activation
    pub const INVINCIBILITY_MS: f64 = 4000.0;
    /// Ship opacity while invincible
    pub const INVINCIBLE_OPACITY: f32 = 0.4;

    /// Oscillating asteroid lateral speed (units/sec)
    pub const ASTEROID_SPEED: f32 = 10.0;
    /// Oscillating asteroids turn around at ±this x
    pub const ASTEROID_BOUND: f32 = 25.0;
    /// Powerup spin per tick on both axes (radians)
    pub const POWERUP_SPIN: f32 = 0.02;

    /// Half extent of the ship's cubic collision volume
    pub const COLLISION_HALF_EXTENT: f32 = 2.5;

    /// Level origin for the ship and its chase camera
    pub const SHIP_ORIGIN: Vec3 = Vec3::new(0.0, 0.0, 10.0);
    pub const CAMERA_ORIGIN: Vec3 = Vec3::new(0.0, 1.0, -5.0);

    /// Level fetches attempted per generation before giving up
    pub const MAX_LEVEL_RETRIES: u32 = 3;
    /// Length of the death sound; the host acknowledges feedback after it
    pub const DEATH_FEEDBACK_MS: f64 = 1200.0;

    pub const DEFAULT_LEVEL_PATH: &str = "levels/corridor.json";
}

/// Move `value` toward zero by `step` without crossing it
#[inline]
pub fn approach_zero(value: f32, step: f32) -> f32 {
    if value > 0.0 {
        (value - step).max(0.0)
    } else if value < 0.0 {
        (value + step).min(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approach_zero_never_overshoots() {
        assert_eq!(approach_zero(0.0005, 0.0008), 0.0);
        assert_eq!(approach_zero(-0.0005, 0.0008), 0.0);
        assert!((approach_zero(0.01, 0.0008) - 0.0092).abs() < 1e-6);
        assert!((approach_zero(-0.01, 0.0008) + 0.0092).abs() < 1e-6);
    }
}
