//! The rendering/asset/audio collaborator the core calls into
//!
//! The simulation never draws, fetches or plays anything itself. Browser and
//! headless hosts implement this trait; see `crate::platform`.

use super::entity::{Entity, EntityId};
use crate::error::GameError;

/// Sound cues the core asks the host to play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundClip {
    /// Ship stopped against a wall or asteroid
    Impact,
    PointsPickup,
    HealthPickup,
    Invincible,
    /// Played once on death; the host answers with `DeathFeedbackFinished`
    Death,
    Finish,
}

impl SoundClip {
    /// Mix level relative to the host's effects volume
    pub fn volume(self) -> f32 {
        match self {
            SoundClip::Impact => 0.6,
            SoundClip::PointsPickup | SoundClip::HealthPickup => 0.8,
            SoundClip::Invincible | SoundClip::Death | SoundClip::Finish => 1.0,
        }
    }
}

pub trait Host {
    /// Milliseconds from an arbitrary fixed origin
    fn now_ms(&self) -> f64;

    fn spawn_visual(&mut self, entity: &Entity);

    /// Release render resources and remove the entity from the scene
    fn dispose_visual(&mut self, id: EntityId);

    fn play_sound(&mut self, clip: SoundClip, volume: f32, looped: bool);

    fn set_ship_opacity(&mut self, opacity: f32);

    /// Start an asynchronous level load. The result must come back as
    /// `LevelLoaded`/`LoadFailed` tagged with the same `generation`.
    fn request_level(&mut self, path: &str, generation: u64);

    /// Start loading the ship model; answered with `ShipLoaded`/`LoadFailed`
    fn request_ship_model(&mut self);

    fn report_error(&mut self, error: &GameError);
}
