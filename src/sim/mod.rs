//! Game core
//!
//! Everything that changes per tick lives here. The core never renders,
//! fetches or plays audio; it talks to the outside world through
//! [`Host`] and receives asynchronous results as [`GameEvent`]s.
//! Iteration order is insertion order (level order), so a run replays
//! identically for the same inputs.

pub mod animate;
pub mod collision;
pub mod entity;
pub mod events;
pub mod host;
pub mod motion;
pub mod proximity;
pub mod state;
pub mod tick;

pub use collision::{Contact, ray_aabb, resolve};
pub use entity::{CanalBounds, Camera, CollisionVolume, Direction, Effect, Entity, EntityId, EntityIndex, EntityKind, Rig, Ship};
pub use events::{AssetKind, EventQueue, GameEvent};
pub use host::{Host, SoundClip};
pub use proximity::CollidableSet;
pub use state::{GameContext, GamePhase, Outcome, Readiness, RunState, RunSummary};
pub use tick::tick;

#[cfg(test)]
mod scenarios;
