//! Browser host
//!
//! Fetches run on the wasm-bindgen-futures executor and deliver their results
//! through a shared inbox. The frame loop moves the inbox into the game's
//! event queue before each tick, so async completions never touch game
//! state directly.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use crate::audio::AudioManager;
use crate::consts::DEATH_FEEDBACK_MS;
use crate::error::GameError;
use crate::level::LevelCatalog;
use crate::settings::Settings;
use crate::sim::{AssetKind, Entity, EntityId, EntityKind, GameEvent, Host, SoundClip};

/// Ship model fetched at boot
const SHIP_MODEL_PATH: &str = "assets/tie_fighter.glb";

/// Events produced outside the frame loop
pub type Inbox = Rc<RefCell<Vec<GameEvent>>>;

pub struct WebHost {
    inbox: Inbox,
    audio: AudioManager,
    /// Entities the scene currently shows
    scene: BTreeMap<EntityId, EntityKind>,
}

impl WebHost {
    pub fn new(settings: &Settings) -> Self {
        Self {
            inbox: Rc::new(RefCell::new(Vec::new())),
            audio: AudioManager::new(settings),
            scene: BTreeMap::new(),
        }
    }

    /// Shared handle for DOM callbacks that produce events
    pub fn inbox(&self) -> Inbox {
        self.inbox.clone()
    }

    /// Take everything delivered since the last frame
    pub fn take_events(&self) -> Vec<GameEvent> {
        std::mem::take(&mut *self.inbox.borrow_mut())
    }

    pub fn audio(&self) -> &AudioManager {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager {
        &mut self.audio
    }

    /// Deliver `event` after `delay_ms`
    fn push_later(&self, event: GameEvent, delay_ms: f64) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let inbox = self.inbox.clone();
        let closure = Closure::once(move || inbox.borrow_mut().push(event));
        let scheduled = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay_ms as i32,
        );
        if scheduled.is_err() {
            log::error!("Failed to schedule timer");
        }
        closure.forget();
    }
}

impl Host for WebHost {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }

    fn spawn_visual(&mut self, entity: &Entity) {
        self.scene.insert(entity.id, entity.kind);
    }

    fn dispose_visual(&mut self, id: EntityId) {
        if self.scene.remove(&id).is_none() {
            log::debug!("dispose of unknown entity {}", id);
        }
    }

    fn play_sound(&mut self, clip: SoundClip, volume: f32, looped: bool) {
        if looped {
            log::debug!("{:?} requested looped; procedural clips play once", clip);
        }
        self.audio.play(clip, volume);
        if clip == SoundClip::Death {
            self.push_later(GameEvent::DeathFeedbackFinished, DEATH_FEEDBACK_MS);
        }
    }

    fn set_ship_opacity(&mut self, opacity: f32) {
        let ship = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("ship"))
            .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok());
        if let Some(ship) = ship {
            let _ = ship.style().set_property("opacity", &opacity.to_string());
        }
    }

    fn request_level(&mut self, path: &str, generation: u64) {
        let inbox = self.inbox.clone();
        let path = path.to_string();
        wasm_bindgen_futures::spawn_local(async move {
            let event = match load_level(&path).await {
                Ok((catalog, skipped)) => GameEvent::LevelLoaded {
                    generation,
                    catalog,
                    skipped,
                },
                Err(error) => GameEvent::LoadFailed {
                    asset: AssetKind::Level,
                    generation,
                    error,
                },
            };
            inbox.borrow_mut().push(event);
        });
    }

    fn request_ship_model(&mut self) {
        let inbox = self.inbox.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let event = match fetch(SHIP_MODEL_PATH).await {
                Ok(_) => GameEvent::ShipLoaded,
                Err(error) => GameEvent::LoadFailed {
                    asset: AssetKind::Ship,
                    generation: 0,
                    error,
                },
            };
            inbox.borrow_mut().push(event);
        });
    }

    fn report_error(&mut self, error: &GameError) {
        log::error!("{}", error);
        let el = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("error"));
        if let Some(el) = el {
            el.set_text_content(Some(&error.to_string()));
            let _ = el.class_list().remove_1("hidden");
        }
    }
}

async fn load_level(path: &str) -> Result<(LevelCatalog, Vec<GameError>), GameError> {
    let response = fetch(path).await?;
    let text = response
        .text()
        .map_err(|e| js_error(path, e))?;
    let text = JsFuture::from(text)
        .await
        .map_err(|e| js_error(path, e))?
        .as_string()
        .ok_or_else(|| GameError::asset_load(path, "response body is not text"))?;

    LevelCatalog::decode(&text)
}

async fn fetch(url: &str) -> Result<Response, GameError> {
    let window = web_sys::window().ok_or_else(|| GameError::asset_load(url, "no window"))?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    let request = Request::new_with_str_and_init(url, &opts).map_err(|e| js_error(url, e))?;

    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| js_error(url, e))?
        .dyn_into()
        .map_err(|e| js_error(url, e))?;

    if !response.ok() {
        return Err(GameError::asset_load(url, format!("HTTP {}", response.status())));
    }
    Ok(response)
}

fn js_error(asset: &str, value: JsValue) -> GameError {
    GameError::asset_load(asset, format!("{:?}", value))
}
