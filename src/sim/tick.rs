//! Per-frame game update
//!
//! Order within a tick: drain events, then (only when fully ready and
//! playing) motion, invincibility timer, proximity refresh, collision,
//! effects, animators. Rendering happens in the host after `tick` returns.

use super::animate::animate;
use super::collision::{self, Contact};
use super::entity::{Effect, EntityId, EntityIndex, EntityKind};
use super::events::{AssetKind, GameEvent};
use super::host::{Host, SoundClip};
use super::motion;
use super::state::{GameContext, GamePhase, Outcome};

/// Advance the game by one display frame of `dt` seconds
pub fn tick(ctx: &mut GameContext, host: &mut impl Host, dt: f32) {
    for event in ctx.events.drain() {
        handle_event(ctx, host, event);
    }

    if !ctx.ready.all() || ctx.run.phase != GamePhase::Playing {
        return;
    }

    motion::integrate(&mut ctx.rig, ctx.steer, ctx.run.moving, &ctx.tuning);

    expire_invincibility(ctx, host);

    let contact = {
        let index = EntityIndex::new(&ctx.entities);
        ctx.collidable
            .refresh(ctx.rig.ship.pos, &index, ctx.tuning.proximity_threshold);
        collision::resolve(&ctx.rig.volume, &ctx.collidable, &index)
    };
    apply_contact(ctx, host, contact);

    // A finish reset rebuilds the world; nothing left to animate this frame
    if ctx.run.phase == GamePhase::Playing && ctx.ready.level_loaded {
        animate(&mut ctx.entities, dt, &ctx.tuning);
    }
}

/// State machine transitions driven from outside the tick loop
fn handle_event(ctx: &mut GameContext, host: &mut impl Host, event: GameEvent) {
    match event {
        GameEvent::IntroFinished | GameEvent::SkipIntro => {
            if !ctx.ready.intro_done {
                log::info!("Intro done");
            }
            ctx.ready.intro_done = true;
        }
        GameEvent::Start => {
            if ctx.ready.intro_done && ctx.run.phase == GamePhase::Intro {
                ctx.ready.started = true;
                ctx.run.phase = GamePhase::Playing;
                log::info!("Game started");
            } else {
                log::debug!("Start ignored in {:?} (intro done: {})", ctx.run.phase, ctx.ready.intro_done);
            }
        }
        GameEvent::ShipLoaded => {
            ctx.ready.ship_loaded = true;
            log::info!("Ship model ready");
        }
        GameEvent::LevelLoaded {
            generation,
            catalog,
            skipped,
        } => {
            if generation != ctx.generation {
                log::warn!(
                    "Dropping stale level load (generation {}, current {})",
                    generation,
                    ctx.generation
                );
            } else if ctx.ready.level_loaded {
                log::warn!("Level for generation {} already loaded, ignoring duplicate", generation);
            } else {
                for error in &skipped {
                    host.report_error(error);
                }
                ctx.populate(&catalog, host);
            }
        }
        GameEvent::LoadFailed {
            asset,
            generation,
            error,
        } => {
            log::error!("{:?} load failed: {}", asset, error);
            host.report_error(&error);
            if asset == AssetKind::Level && generation == ctx.generation && !ctx.ready.level_loaded {
                if ctx.level_attempts < ctx.tuning.max_level_retries {
                    log::info!(
                        "Retrying level load ({}/{})",
                        ctx.level_attempts + 1,
                        ctx.tuning.max_level_retries
                    );
                    ctx.request_level(host);
                } else {
                    log::error!("Giving up on level '{}'", ctx.level_path);
                }
            }
        }
        GameEvent::DeathFeedbackFinished => {
            if ctx.run.phase == GamePhase::Dead {
                ctx.reset(Outcome::Died, host);
            }
        }
    }
}

fn expire_invincibility(ctx: &mut GameContext, host: &mut impl Host) {
    let Some(since) = ctx.run.invincible_since else {
        return;
    };
    if host.now_ms() - since >= ctx.tuning.invincibility_ms {
        ctx.run.invincible = false;
        ctx.run.invincible_since = None;
        ctx.rig.ship.opacity = 1.0;
        host.set_ship_opacity(1.0);
        log::debug!("Invincibility expired");
    }
}

fn apply_contact(ctx: &mut GameContext, host: &mut impl Host, contact: Option<Contact>) {
    let Some(kind) = contact.and_then(|c| ctx.entity(c.entity).map(|e| (c.entity, e.kind))) else {
        ctx.run.moving = true;
        return;
    };

    match kind {
        (_, EntityKind::Wall | EntityKind::Asteroid) => hit_obstacle(ctx, host),
        (id, EntityKind::Powerup(effect)) => collect_powerup(ctx, host, id, effect),
        (_, EntityKind::Finish) => {
            ctx.run.phase = GamePhase::Finished;
            host.play_sound(SoundClip::Finish, SoundClip::Finish.volume(), false);
            ctx.reset(Outcome::Finished, host);
        }
    }
}

fn hit_obstacle(ctx: &mut GameContext, host: &mut impl Host) {
    if ctx.run.invincible {
        ctx.run.moving = true;
        return;
    }

    if ctx.run.moving {
        host.play_sound(SoundClip::Impact, SoundClip::Impact.volume(), false);
    }
    ctx.run.moving = false;
    ctx.run.health = (ctx.run.health - ctx.tuning.wall_damage).max(0.0);

    if ctx.run.health <= 0.0 {
        ctx.run.phase = GamePhase::Dead;
        host.play_sound(SoundClip::Death, SoundClip::Death.volume(), false);
        log::info!("Ship destroyed");
    }
}

/// Consume one powerup. `colliding` is held for the duration of the
/// consumption; a nested call for another powerup is ignored.
fn collect_powerup(ctx: &mut GameContext, host: &mut impl Host, id: EntityId, effect: Effect) {
    if ctx.run.colliding {
        return;
    }
    ctx.run.colliding = true;

    let tuning = &ctx.tuning;
    match effect {
        Effect::Points => {
            ctx.run.score += tuning.pickup_score;
            host.play_sound(SoundClip::PointsPickup, SoundClip::PointsPickup.volume(), false);
        }
        Effect::Health => {
            ctx.run.score += tuning.pickup_score;
            ctx.run.health = (ctx.run.health + tuning.health_pickup).min(crate::consts::MAX_HEALTH);
            host.play_sound(SoundClip::HealthPickup, SoundClip::HealthPickup.volume(), false);
        }
        Effect::Invincible => {
            ctx.run.invincible = true;
            ctx.run.invincible_since = Some(host.now_ms());
            ctx.rig.ship.opacity = tuning.invincible_opacity;
            host.set_ship_opacity(tuning.invincible_opacity);
            host.play_sound(SoundClip::Invincible, SoundClip::Invincible.volume(), false);
        }
    }
    log::debug!("Collected {:?} powerup {}", effect, id);

    ctx.remove_entity(id, host);
    ctx.run.moving = true;
    ctx.run.colliding = false;
}
