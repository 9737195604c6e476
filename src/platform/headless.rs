//! Host without a screen or speakers
//!
//! Records every collaborator call so runs can be inspected afterwards. The
//! clock only moves when the driver advances it.

use crate::error::GameError;
use crate::sim::{Entity, EntityId, Host, SoundClip};

#[derive(Debug, Clone)]
pub struct HeadlessHost {
    /// Value returned by `now_ms`
    pub clock_ms: f64,
    pub spawned: Vec<EntityId>,
    pub disposed: Vec<EntityId>,
    pub sounds: Vec<SoundClip>,
    /// Last opacity the core asked for
    pub opacity: f32,
    /// Rendered error messages, oldest first
    pub errors: Vec<String>,
    pub ship_requested: bool,
    level_request: Option<(String, u64)>,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self {
            clock_ms: 0.0,
            spawned: Vec::new(),
            disposed: Vec::new(),
            sounds: Vec::new(),
            opacity: 1.0,
            errors: Vec::new(),
            ship_requested: false,
            level_request: None,
        }
    }

    pub fn advance(&mut self, ms: f64) {
        self.clock_ms += ms;
    }

    /// Pending level fetch, if the core asked for one since the last call
    pub fn take_level_request(&mut self) -> Option<(String, u64)> {
        self.level_request.take()
    }

    /// Number of times `clip` was played
    pub fn played(&self, clip: SoundClip) -> usize {
        self.sounds.iter().filter(|&&s| s == clip).count()
    }
}

impl Host for HeadlessHost {
    fn now_ms(&self) -> f64 {
        self.clock_ms
    }

    fn spawn_visual(&mut self, entity: &Entity) {
        log::trace!("spawn {} {:?} at {}", entity.id, entity.kind, entity.pos);
        self.spawned.push(entity.id);
    }

    fn dispose_visual(&mut self, id: EntityId) {
        log::trace!("dispose {}", id);
        self.disposed.push(id);
    }

    fn play_sound(&mut self, clip: SoundClip, volume: f32, looped: bool) {
        log::debug!("sound {:?} (volume {:.2}, looped {})", clip, volume, looped);
        self.sounds.push(clip);
    }

    fn set_ship_opacity(&mut self, opacity: f32) {
        log::debug!("ship opacity {:.2}", opacity);
        self.opacity = opacity;
    }

    fn request_level(&mut self, path: &str, generation: u64) {
        log::debug!("level request '{}' (generation {})", path, generation);
        if let Some((old, old_generation)) = self.level_request.replace((path.to_string(), generation)) {
            log::warn!("Superseded pending level request '{}' (generation {})", old, old_generation);
        }
    }

    fn request_ship_model(&mut self) {
        log::debug!("ship model request");
        self.ship_requested = true;
    }

    fn report_error(&mut self, error: &GameError) {
        log::warn!("reported: {}", error);
        self.errors.push(error.to_string());
    }
}
