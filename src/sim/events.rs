//! External events fed into the game state machine
//!
//! Input handlers and asynchronous load completions never touch game state
//! directly. They push an event; the next tick drains the queue before doing
//! anything else.

use std::collections::VecDeque;

use crate::error::GameError;
use crate::level::LevelCatalog;

/// Which asynchronous load an event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Level,
    Ship,
    Audio,
}

#[derive(Debug)]
pub enum GameEvent {
    /// Intro video played to the end
    IntroFinished,
    /// Player skipped the intro
    SkipIntro,
    /// Player pressed the start control
    Start,
    /// Ship model finished loading
    ShipLoaded,
    /// Level catalog decoded for the given reset generation
    LevelLoaded {
        generation: u64,
        catalog: LevelCatalog,
        /// Entries the decoder dropped
        skipped: Vec<GameError>,
    },
    LoadFailed {
        asset: AssetKind,
        generation: u64,
        error: GameError,
    },
    /// Death sound finished playing
    DeathFeedbackFinished,
}

/// FIFO of pending events
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }

    /// Take every pending event, oldest first
    pub fn drain(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
