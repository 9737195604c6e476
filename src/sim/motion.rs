//! Player motion model
//!
//! Forward flight advances a fixed amount every tick, regardless of frame
//! duration. Steering follows the pointer's offset from screen center and is
//! clamped to the canal.

use glam::{Vec2, Vec3};

use super::entity::{CanalBounds, Rig, Ship};
use crate::approach_zero;
use crate::tuning::Tuning;

/// Advance the rig by one tick.
///
/// `steer` is the signed pointer offset from screen center in pixels.
pub fn integrate(rig: &mut Rig, steer: Vec2, moving: bool, tuning: &Tuning) {
    if moving {
        rig.translate(Vec3::new(0.0, 0.0, tuning.fly_speed));
    }
    shift(rig, steer * tuning.steer_sensitivity, &tuning.bounds);
    settle(&mut rig.ship, tuning.rotation_decay);
}

/// Move the rig laterally/vertically, keeping the ship inside the canal.
///
/// The camera and collision volume receive the same (clamped) offset.
pub fn shift(rig: &mut Rig, offset: Vec2, bounds: &CanalBounds) {
    let x = (rig.ship.pos.x + offset.x).clamp(bounds.x_min, bounds.x_max);
    let y = (rig.ship.pos.y + offset.y).clamp(bounds.y_min, bounds.y_max);
    let applied = Vec3::new(x - rig.ship.pos.x, y - rig.ship.pos.y, 0.0);
    rig.translate(applied);
    rig.ship.pos.x = x;
    rig.ship.pos.y = y;
    rig.volume.center.x = x;
    rig.volume.center.y = y;
}

/// Add roll/pitch, bounded to ±`max_tilt`
pub fn tilt(ship: &mut Ship, roll: f32, pitch: f32, max_tilt: f32) {
    ship.roll = (ship.roll + roll).clamp(-max_tilt, max_tilt);
    ship.pitch = (ship.pitch + pitch).clamp(-max_tilt, max_tilt);
}

/// Return roll and pitch linearly toward neutral, stopping exactly at zero
pub fn settle(ship: &mut Ship, decay: f32) {
    ship.roll = approach_zero(ship.roll, decay);
    ship.pitch = approach_zero(ship.pitch, decay);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_forward_advance_is_per_tick() {
        let tuning = Tuning::default();
        let mut rig = Rig::default();
        integrate(&mut rig, Vec2::ZERO, true, &tuning);
        integrate(&mut rig, Vec2::ZERO, true, &tuning);
        assert!((rig.ship.pos.z - (SHIP_ORIGIN.z + 2.0 * FLY_SPEED)).abs() < 1e-5);
        assert!((rig.camera.pos.z - (CAMERA_ORIGIN.z + 2.0 * FLY_SPEED)).abs() < 1e-5);
        assert_eq!(rig.volume.center, rig.ship.pos);
    }

    #[test]
    fn test_stopped_ship_still_steers() {
        let tuning = Tuning::default();
        let mut rig = Rig::default();
        integrate(&mut rig, Vec2::new(100.0, 0.0), false, &tuning);
        assert_eq!(rig.ship.pos.z, SHIP_ORIGIN.z);
        assert!((rig.ship.pos.x - 100.0 * STEER_SENSITIVITY).abs() < 1e-6);
    }

    #[test]
    fn test_lateral_clamp_moves_camera_by_applied_amount() {
        let tuning = Tuning::default();
        let mut rig = Rig::default();
        rig.translate(Vec3::new(39.99, 0.0, 0.0));
        let camera_x = rig.camera.pos.x;
        integrate(&mut rig, Vec2::new(1_000_000.0, 0.0), false, &tuning);
        assert_eq!(rig.ship.pos.x, CANAL_X_MAX);
        assert!((rig.camera.pos.x - camera_x - (CANAL_X_MAX - 39.99)).abs() < 1e-4);
    }

    #[test]
    fn test_cannot_sink_below_ground() {
        let tuning = Tuning::default();
        let mut rig = Rig::default();
        for _ in 0..100 {
            integrate(&mut rig, Vec2::new(0.0, -10_000.0), true, &tuning);
        }
        assert_eq!(rig.ship.pos.y, GROUND_Y);
        assert!(tuning.bounds.contains(rig.ship.pos));
    }

    #[test]
    fn test_rotation_settles_without_overshoot() {
        let mut ship = Rig::default().ship;
        ship.roll = 0.001;
        ship.pitch = -0.001;
        settle(&mut ship, ROTATION_DECAY);
        assert!((ship.roll - 0.0002).abs() < 1e-7);
        settle(&mut ship, ROTATION_DECAY);
        assert_eq!(ship.roll, 0.0);
        assert_eq!(ship.pitch, 0.0);
        settle(&mut ship, ROTATION_DECAY);
        assert_eq!(ship.roll, 0.0);
    }

    #[test]
    fn test_tilt_is_bounded() {
        let mut ship = Rig::default().ship;
        for _ in 0..1000 {
            tilt(&mut ship, KEY_TILT, -KEY_TILT, MAX_TILT);
        }
        assert_eq!(ship.roll, MAX_TILT);
        assert_eq!(ship.pitch, -MAX_TILT);
    }
}
