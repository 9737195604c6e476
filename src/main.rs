//! TIE Run entry point
//!
//! Browser: DOM input wiring and the requestAnimationFrame loop.
//! Native: a headless runner that flies a scripted course through a level.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{KeyboardEvent, MouseEvent};

    use tie_run::platform::WebHost;
    use tie_run::platform::web::Inbox;
    use tie_run::sim::{GameContext, GameEvent, GamePhase, tick};
    use tie_run::{HighScores, Settings};

    /// Game instance holding all state
    struct Game {
        ctx: GameContext,
        host: WebHost,
        settings: Settings,
        scores: HighScores,
        last_time: f64,
        window_center: (f32, f32),
        /// Generation whose run summary was already recorded
        recorded_generation: u64,
        last_phase: GamePhase,
    }

    impl Game {
        fn new(settings: Settings) -> Self {
            let mut ctx = GameContext::new(settings.level_path.clone(), settings.tuning());
            ctx.rig.volume.visible = settings.show_collision_volume;
            let host = WebHost::new(&settings);
            Self {
                ctx,
                host,
                settings,
                scores: HighScores::load(),
                last_time: 0.0,
                window_center: (0.0, 0.0),
                recorded_generation: 0,
                last_phase: GamePhase::Intro,
            }
        }

        fn set_window_center(&mut self, w: f32, h: f32) {
            self.window_center = (w / 2.0, h / 2.0);
        }

        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0).min(0.1) as f32
            } else {
                0.0
            };
            self.last_time = time;

            for event in self.host.take_events() {
                self.ctx.push_event(event);
            }
            tick(&mut self.ctx, &mut self.host, dt);

            if self.ctx.generation != self.recorded_generation {
                self.recorded_generation = self.ctx.generation;
                if let Some(run) = self.ctx.last_run {
                    if let Some(rank) = self.scores.record(&run, js_sys::Date::now()) {
                        log::info!("New high score #{}: {}", rank, run.score);
                        self.scores.save();
                    }
                }
            }

            if self.ctx.run.phase != self.last_phase {
                log::info!("Phase {:?} -> {:?}", self.last_phase, self.ctx.run.phase);
                self.last_phase = self.ctx.run.phase;
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.ctx.run.score.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-health .hud-value").ok().flatten() {
                el.set_text_content(Some(&format!("{:.0}", self.ctx.run.health)));
            }
            if let Some(el) = document.query_selector("#hud-best .hud-value").ok().flatten() {
                let best = self.scores.top_score().unwrap_or(0);
                el.set_text_content(Some(&best.to_string()));
            }
            if let Some(el) = document.get_element_by_id("hud-shield") {
                let class = if self.ctx.run.invincible { "hud-item" } else { "hud-item hidden" };
                let _ = el.set_attribute("class", class);
            }
            if let Some(el) = document.get_element_by_id("hud") {
                let class = if self.ctx.run.phase == GamePhase::Intro { "hidden" } else { "" };
                let _ = el.set_attribute("class", class);
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
        }

        log::info!("TIE Run starting...");

        let Some(window) = web_sys::window() else {
            log::error!("no window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("no document");
            return;
        };

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let settings = Settings::load();
        let game = Rc::new(RefCell::new(Game::new(settings)));
        {
            let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let mut g = game.borrow_mut();
            g.set_window_center(w as f32, h as f32);
            let Game { ctx, host, .. } = &mut *g;
            ctx.boot(host);
        }

        let inbox = game.borrow().host.inbox();
        setup_input_handlers(game.clone());
        setup_intro(game.clone(), inbox);

        request_animation_frame(game);

        log::info!("TIE Run running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Pointer offset from window center steers the ship
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let (cx, cy) = g.window_center;
                let dx = cx - event.client_x() as f32;
                let dy = cy - event.client_y() as f32;
                g.ctx.on_pointer_delta(dx, dy);
            });
            let _ = document.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.ctx.on_key(&event.code());
                if event.code() == "KeyC" {
                    let visible = g.ctx.rig.volume.visible;
                    g.settings.show_collision_volume = visible;
                    g.settings.save();
                }
                if event.code() == "KeyM" {
                    let muted = !g.settings.muted;
                    g.settings.muted = muted;
                    g.host.audio_mut().set_muted(muted);
                    g.settings.save();
                    log::info!("Muted: {}", muted);
                }
            });
            let _ = document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
                let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
                game.borrow_mut().set_window_center(w as f32, h as f32);
            });
            let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Intro video, skip and start controls
    fn setup_intro(game: Rc<RefCell<Game>>, inbox: Inbox) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(video) = document
            .get_element_by_id("intro")
            .and_then(|el| el.dyn_into::<web_sys::HtmlVideoElement>().ok())
        {
            video.set_volume(game.borrow().settings.effective_music_volume() as f64);
            let inbox = inbox.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                inbox.borrow_mut().push(GameEvent::IntroFinished);
            });
            let _ = video.add_event_listener_with_callback("ended", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("skip-btn") {
            let inbox = inbox.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                inbox.borrow_mut().push(GameEvent::SkipIntro);
                if let Some(video) = web_sys::window()
                    .and_then(|w| w.document())
                    .and_then(|d| d.get_element_by_id("intro"))
                    .and_then(|el| el.dyn_into::<web_sys::HtmlMediaElement>().ok())
                {
                    let _ = video.pause();
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("start-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow().host.audio().resume();
                inbox.borrow_mut().push(GameEvent::Start);
                if let Some(el) = web_sys::window()
                    .and_then(|w| w.document())
                    .and_then(|d| d.get_element_by_id("intro-screen"))
                {
                    let _ = el.set_attribute("class", "hidden");
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.update_hud();
        }
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("TIE Run (native) starting...");

    let mut args = std::env::args().skip(1);
    let level_path = args.next();
    let ticks = args.next().and_then(|t| t.parse().ok()).unwrap_or(6000);

    headless::run(level_path, ticks);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use tie_run::consts::DEATH_FEEDBACK_MS;
    use tie_run::platform::HeadlessHost;
    use tie_run::sim::{AssetKind, GameContext, GameEvent, GamePhase, SoundClip, tick};
    use tie_run::{GameError, LevelCatalog, Settings};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Load the level the core asked for. No path means the built-in corridor.
    fn load(path: Option<&str>) -> Result<(LevelCatalog, Vec<GameError>), GameError> {
        match path {
            Some(path) => LevelCatalog::load_file(path),
            None => Ok((LevelCatalog::demo(), Vec::new())),
        }
    }

    /// Weave across the canal so the run touches walls and pickups
    fn scripted_steer(frame: u64) -> (f32, f32) {
        let t = frame as f32 / 90.0;
        (t.sin() * 600.0, (t * 0.5).cos() * 200.0)
    }

    pub fn run(level_path: Option<String>, ticks: u64) {
        let settings = Settings::load();
        let path_label = level_path.clone().unwrap_or_else(|| "<demo>".to_string());
        let mut host = HeadlessHost::new();
        let mut ctx = GameContext::new(path_label, settings.tuning());

        ctx.boot(&mut host);
        ctx.push_event(GameEvent::ShipLoaded);
        ctx.push_event(GameEvent::SkipIntro);
        ctx.push_event(GameEvent::Start);

        let mut died_at: Option<f64> = None;
        let mut runs = 0;

        for frame in 0..ticks {
            if let Some((_, generation)) = host.take_level_request() {
                let event = match load(level_path.as_deref()) {
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
                ctx.push_event(event);
            }

            let (dx, dy) = scripted_steer(frame);
            ctx.on_pointer_delta(dx, dy);

            let generation = ctx.generation;
            let deaths = host.played(SoundClip::Death);
            tick(&mut ctx, &mut host, (FRAME_MS / 1000.0) as f32);
            host.advance(FRAME_MS);

            if host.played(SoundClip::Death) > deaths {
                died_at = Some(host.clock_ms);
            }
            if let Some(at) = died_at {
                if ctx.run.phase == GamePhase::Dead && host.clock_ms - at >= DEATH_FEEDBACK_MS {
                    ctx.push_event(GameEvent::DeathFeedbackFinished);
                    died_at = None;
                }
            }

            if ctx.generation != generation {
                runs += 1;
                if let Some(summary) = ctx.last_run {
                    println!(
                        "run {:>3}: {:?}, score {:.0}, distance {:.1}",
                        runs, summary.outcome, summary.score, summary.distance
                    );
                }
            }
        }

        println!(
            "{} ticks, {} completed runs; current run: score {:.0}, health {:.1}, z {:.1}, phase {:?}",
            ticks,
            runs,
            ctx.run.score,
            ctx.run.health,
            ctx.rig.ship.pos.z,
            ctx.run.phase
        );
        if !host.errors.is_empty() {
            println!("{} load errors reported", host.errors.len());
        }
    }
}
