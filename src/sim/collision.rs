//! Collision resolution against the proximity candidates
//!
//! Rays are cast from the center of the ship's collision volume through each
//! of its corners. A candidate blocks the ship when one of those rays enters
//! the candidate's box before reaching the corner.

use glam::Vec3;

use super::entity::{CollisionVolume, Entity, EntityId, EntityIndex};
use super::proximity::CollidableSet;

/// The nearest blocking entity found this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub entity: EntityId,
    /// Distance along the ray from the volume center to the hit
    pub distance: f32,
}

/// Slab test of a ray against an axis-aligned box.
///
/// `dir` must be normalized. Returns the entry distance, or 0.0 when the
/// origin is already inside the box.
pub fn ray_aabb(origin: Vec3, dir: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        if d.abs() < f32::EPSILON {
            // Parallel to this slab: must already be between its planes
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let t1 = (min[axis] - o) / d;
        let t2 = (max[axis] - o) / d;
        t_near = t_near.max(t1.min(t2));
        t_far = t_far.min(t1.max(t2));
        if t_near > t_far {
            return None;
        }
    }

    if t_far < 0.0 {
        return None;
    }
    Some(t_near.max(0.0))
}

/// Nearest hit of any corner ray against a single entity
fn entity_hit(volume: &CollisionVolume, entity: &Entity) -> Option<f32> {
    let (min, max) = (entity.min(), entity.max());
    let mut nearest: Option<f32> = None;

    for offset in volume.corner_offsets() {
        let reach = offset.length();
        if reach <= 0.0 {
            continue;
        }
        let Some(t) = ray_aabb(volume.center, offset / reach, min, max) else {
            continue;
        };
        if t < reach && nearest.is_none_or(|n| t < n) {
            nearest = Some(t);
        }
    }

    nearest
}

/// Find the single nearest blocking entity among the collidable set.
///
/// Candidates are visited in set order and only a strictly nearer hit
/// replaces the current best, so equal distances keep the first member.
/// Non-collidable entities and ids missing from `index` are skipped.
pub fn resolve(volume: &CollisionVolume, candidates: &CollidableSet, index: &EntityIndex) -> Option<Contact> {
    let mut best: Option<Contact> = None;

    for id in candidates.iter() {
        let Some(entity) = index.get(id) else {
            continue;
        };
        if !entity.collidable {
            continue;
        }
        if let Some(distance) = entity_hit(volume, entity) {
            if best.is_none_or(|b| distance < b.distance) {
                best = Some(Contact {
                    entity: id,
                    distance,
                });
            }
        }
    }

    best
}
