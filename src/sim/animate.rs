//! Per-entity periodic motion
//!
//! Asteroids flagged as moving sweep across the canal; powerups spin.
//! Neither affects the proximity index until its next refresh.

use super::entity::{Direction, Entity, EntityKind};
use crate::tuning::Tuning;

/// Advance every animated entity by `dt` seconds (asteroids) or one tick (spin)
pub fn animate(entities: &mut [Entity], dt: f32, tuning: &Tuning) {
    for entity in entities.iter_mut() {
        match entity.kind {
            EntityKind::Asteroid => {
                if let Some(direction) = entity.oscillation {
                    let next =
                        oscillate(entity, direction, dt, tuning.asteroid_speed, tuning.asteroid_bound);
                    entity.oscillation = Some(next);
                }
            }
            EntityKind::Powerup(_) => {
                entity.rotation.x += tuning.powerup_spin;
                entity.rotation.y += tuning.powerup_spin;
            }
            EntityKind::Wall | EntityKind::Finish => {}
        }
    }
}

/// Slide along x, turning around at ±`bound`. Returns the new direction.
fn oscillate(entity: &mut Entity, direction: Direction, dt: f32, speed: f32, bound: f32) -> Direction {
    entity.pos.x += direction.sign() * speed * dt;

    if entity.pos.x >= bound {
        entity.pos.x = bound;
        Direction::Left
    } else if entity.pos.x <= -bound {
        entity.pos.x = -bound;
        Direction::Right
    } else {
        direction
    }
}
