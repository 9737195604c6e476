//! Run state and the owning game context
//!
//! `GameContext` owns everything the per-tick systems mutate. Hosts hold one
//! context, feed it input and events, and call `tick` once per frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId, Rig};
use super::events::{EventQueue, GameEvent};
use super::host::Host;
use super::motion;
use super::proximity::CollidableSet;
use crate::consts::*;
use crate::level::LevelCatalog;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Intro video, waiting for the start control
    Intro,
    /// Active flight
    Playing,
    /// Health ran out; waiting for the death feedback to finish
    Dead,
    /// Crossed the finish gate
    Finished,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Died,
    Finished,
}

/// Snapshot of a run taken at reset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: f32,
    pub outcome: Outcome,
    /// Forward distance flown from the level origin
    pub distance: f32,
}

/// Mutable per-run state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// 0..=100
    pub health: f32,
    /// Only grows during a run
    pub score: f32,
    pub invincible: bool,
    /// Host clock time invincibility was activated
    pub invincible_since: Option<f64>,
    /// Gates forward translation
    pub moving: bool,
    /// Set while a powerup is being consumed
    pub colliding: bool,
    pub phase: GamePhase,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            health: MAX_HEALTH,
            score: 0.0,
            invincible: false,
            invincible_since: None,
            moving: true,
            colliding: false,
            phase: GamePhase::Playing,
        }
    }
}

/// Readiness gates. Per-tick logic no-ops until every flag is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Readiness {
    pub ship_loaded: bool,
    pub level_loaded: bool,
    pub intro_done: bool,
    pub started: bool,
}

impl Readiness {
    pub fn all(&self) -> bool {
        self.ship_loaded && self.level_loaded && self.intro_done && self.started
    }
}

/// Everything the game core owns
#[derive(Debug)]
pub struct GameContext {
    pub run: RunState,
    pub ready: Readiness,
    pub rig: Rig,
    /// Live level entities (ship excluded)
    pub entities: Vec<Entity>,
    pub collidable: CollidableSet,
    pub tuning: Tuning,
    /// Latest pointer offset from screen center
    pub steer: Vec2,
    /// Bumped on every reset; stale level loads carry an older value
    pub generation: u64,
    pub level_path: String,
    /// Summary of the most recently ended run
    pub last_run: Option<RunSummary>,
    /// Level fetches issued for the current generation
    pub(crate) level_attempts: u32,
    pub(crate) events: EventQueue,
    next_id: EntityId,
}

impl GameContext {
    pub fn new(level_path: impl Into<String>, tuning: Tuning) -> Self {
        Self {
            run: RunState {
                phase: GamePhase::Intro,
                ..RunState::default()
            },
            ready: Readiness::default(),
            rig: Rig::default(),
            entities: Vec::new(),
            collidable: CollidableSet::new(),
            tuning,
            steer: Vec2::ZERO,
            generation: 0,
            level_path: level_path.into(),
            last_run: None,
            level_attempts: 0,
            events: EventQueue::new(),
            next_id: 1,
        }
    }

    /// Kick off the initial ship and level loads
    pub fn boot(&mut self, host: &mut impl Host) {
        log::info!("Booting, level '{}'", self.level_path);
        host.request_ship_model();
        self.request_level(host);
    }

    /// Queue an external event for the next tick
    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Pointer offset from screen center (positive x steers toward +x)
    pub fn on_pointer_delta(&mut self, dx: f32, dy: f32) {
        self.steer = Vec2::new(dx, dy);
    }

    /// Keyboard nudges and camera/debug toggles. Ignored until the ship exists.
    pub fn on_key(&mut self, code: &str) {
        if !self.ready.ship_loaded {
            return;
        }
        let max_tilt = self.tuning.max_tilt;
        match code {
            "KeyA" => {
                motion::shift(&mut self.rig, Vec2::new(KEY_NUDGE, 0.0), &self.tuning.bounds);
                motion::tilt(&mut self.rig.ship, -KEY_TILT, 0.0, max_tilt);
            }
            "KeyD" => {
                motion::shift(&mut self.rig, Vec2::new(-KEY_NUDGE, 0.0), &self.tuning.bounds);
                motion::tilt(&mut self.rig.ship, KEY_TILT, 0.0, max_tilt);
            }
            "KeyW" => motion::tilt(&mut self.rig.ship, 0.0, KEY_TILT, max_tilt),
            "KeyS" => motion::tilt(&mut self.rig.ship, 0.0, -KEY_TILT, max_tilt),
            "KeyE" => self.rig.camera.yaw += CAMERA_STEP,
            "KeyQ" => self.rig.camera.yaw -= CAMERA_STEP,
            "KeyR" => self.rig.camera.pitch -= CAMERA_STEP,
            "KeyT" => self.rig.camera.pitch += CAMERA_STEP,
            "KeyC" => {
                self.rig.volume.visible = !self.rig.volume.visible;
                log::debug!("Collision volume overlay: {}", self.rig.volume.visible);
            }
            _ => {}
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Spawn a decoded level into the world
    pub(crate) fn populate(&mut self, catalog: &LevelCatalog, host: &mut impl Host) {
        let entities = catalog.instantiate(|| self.next_entity_id());
        for entity in &entities {
            host.spawn_visual(entity);
        }
        self.entities.extend(entities);
        self.ready.level_loaded = true;
        log::info!(
            "Level '{}' ready ({} entities, generation {})",
            catalog.name,
            self.entities.len(),
            self.generation
        );
    }

    /// Remove an entity from the scene and from every tracked set
    pub(crate) fn remove_entity(&mut self, id: EntityId, host: &mut impl Host) {
        host.dispose_visual(id);
        self.entities.retain(|e| e.id != id);
        self.collidable.remove(id);
    }

    pub(crate) fn request_level(&mut self, host: &mut impl Host) {
        self.level_attempts += 1;
        host.request_level(&self.level_path, self.generation);
    }

    /// End the current run and rebuild the level from scratch
    pub(crate) fn reset(&mut self, outcome: Outcome, host: &mut impl Host) {
        let summary = RunSummary {
            score: self.run.score,
            outcome,
            distance: self.rig.ship.pos.z - SHIP_ORIGIN.z,
        };
        log::info!(
            "Run over ({:?}): score {}, distance {:.1}",
            summary.outcome,
            summary.score,
            summary.distance
        );
        self.last_run = Some(summary);

        for entity in self.entities.drain(..) {
            host.dispose_visual(entity.id);
        }
        self.collidable.clear();

        if self.run.invincible {
            host.set_ship_opacity(1.0);
        }
        self.run = RunState::default();

        let overlay = self.rig.volume.visible;
        self.rig = Rig::default();
        self.rig.volume.visible = overlay;
        self.steer = Vec2::ZERO;

        self.generation += 1;
        self.ready.level_loaded = false;
        self.level_attempts = 0;
        self.request_level(host);
    }
}
