//! World entities and the player's flight rig

use std::collections::HashMap;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Stable entity identity (never reused within a context)
pub type EntityId = u32;

/// Gameplay consequence of collecting a powerup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    Points,
    Health,
    Invincible,
}

/// What an entity is, and therefore what touching it does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Wall,
    Asteroid,
    Powerup(Effect),
    Finish,
}

/// Lateral travel direction of an oscillating asteroid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// A placed level entity (axis-aligned box)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec3,
    /// Full box size along each axis
    pub extents: Vec3,
    pub collidable: bool,
    /// Cosmetic orientation (powerup spin)
    #[serde(default)]
    pub rotation: Vec2,
    /// Present on asteroids that sweep across the canal
    #[serde(default)]
    pub oscillation: Option<Direction>,
    /// Opaque material/texture reference for the renderer
    #[serde(default)]
    pub material: Option<String>,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind, pos: Vec3, extents: Vec3) -> Self {
        Self {
            id,
            kind,
            pos,
            extents,
            collidable: true,
            rotation: Vec2::ZERO,
            oscillation: None,
            material: None,
        }
    }

    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        self.extents * 0.5
    }

    /// Minimum corner of the bounding box
    #[inline]
    pub fn min(&self) -> Vec3 {
        self.pos - self.half_extents()
    }

    /// Maximum corner of the bounding box
    #[inline]
    pub fn max(&self) -> Vec3 {
        self.pos + self.half_extents()
    }

    pub fn is_powerup(&self) -> bool {
        matches!(self.kind, EntityKind::Powerup(_))
    }
}

/// Id lookup over one tick's entity list.
///
/// Built once per tick and shared by the proximity refresh and the collision
/// resolver, so per-member lookups are O(1).
#[derive(Debug)]
pub struct EntityIndex<'a> {
    entities: &'a [Entity],
    slots: HashMap<EntityId, usize>,
}

impl<'a> EntityIndex<'a> {
    pub fn new(entities: &'a [Entity]) -> Self {
        let slots = entities.iter().enumerate().map(|(slot, e)| (e.id, slot)).collect();
        Self { entities, slots }
    }

    pub fn get(&self, id: EntityId) -> Option<&'a Entity> {
        self.slots.get(&id).map(|&slot| &self.entities[slot])
    }

    /// Entities in level order
    pub fn entities(&self) -> &'a [Entity] {
        self.entities
    }
}

/// The player-controlled fighter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec3,
    /// Rotation about the forward axis (radians)
    pub roll: f32,
    /// Rotation about the lateral axis (radians)
    pub pitch: f32,
    pub opacity: f32,
}

/// Chase camera, translated in lockstep with the ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    pub pos: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

/// Cube the collision rays are cast from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollisionVolume {
    pub center: Vec3,
    pub half_extent: f32,
    /// Debug overlay toggle (KeyC)
    pub visible: bool,
}

impl CollisionVolume {
    /// Offsets from the center to each of the eight cube corners
    pub fn corner_offsets(&self) -> [Vec3; 8] {
        let h = self.half_extent;
        [
            Vec3::new(-h, -h, -h),
            Vec3::new(h, -h, -h),
            Vec3::new(-h, h, -h),
            Vec3::new(h, h, -h),
            Vec3::new(-h, -h, h),
            Vec3::new(h, -h, h),
            Vec3::new(-h, h, h),
            Vec3::new(h, h, h),
        ]
    }
}

/// Everything that translates with the player: ship, camera, collision volume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rig {
    pub ship: Ship,
    pub camera: Camera,
    pub volume: CollisionVolume,
}

impl Default for Rig {
    fn default() -> Self {
        Self {
            ship: Ship {
                pos: SHIP_ORIGIN,
                roll: 0.0,
                pitch: 0.0,
                opacity: 1.0,
            },
            camera: Camera {
                pos: CAMERA_ORIGIN,
                yaw: 0.0,
                pitch: 0.0,
            },
            volume: CollisionVolume {
                center: SHIP_ORIGIN,
                half_extent: COLLISION_HALF_EXTENT,
                visible: false,
            },
        }
    }
}

impl Rig {
    /// Translate ship, camera and collision volume together
    pub fn translate(&mut self, delta: Vec3) {
        self.ship.pos += delta;
        self.camera.pos += delta;
        self.volume.center += delta;
    }
}

/// Travel corridor the ship is confined to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanalBounds {
    pub x_min: f32,
    pub x_max: f32,
    /// Ground plane
    pub y_min: f32,
    pub y_max: f32,
}

impl Default for CanalBounds {
    fn default() -> Self {
        Self {
            x_min: CANAL_X_MIN,
            x_max: CANAL_X_MAX,
            y_min: GROUND_Y,
            y_max: CANAL_Y_MAX,
        }
    }
}

impl CanalBounds {
    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.x_min && p.x <= self.x_max && p.y >= self.y_min && p.y <= self.y_max
    }
}
