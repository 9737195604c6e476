//! End-to-end runs through the public core API with a recording host

use glam::Vec3;

use super::*;
use crate::consts::*;
use crate::error::GameError;
use crate::level::{LevelCatalog, Placement};
use crate::platform::HeadlessHost;
use crate::tuning::Tuning;

/// Context with the level and every readiness event queued; the first tick
/// applies them and flies
fn queued(placements: Vec<Placement>) -> (GameContext, HeadlessHost) {
    let catalog = LevelCatalog {
        name: "scenario".into(),
        placements,
    };
    queued_with(catalog, Vec::new())
}

fn queued_with(catalog: LevelCatalog, skipped: Vec<GameError>) -> (GameContext, HeadlessHost) {
    let mut host = HeadlessHost::new();
    let mut ctx = GameContext::new("corridor.json", Tuning::default());
    ctx.boot(&mut host);
    let (_, generation) = host.take_level_request().unwrap();
    ctx.push_event(GameEvent::ShipLoaded);
    ctx.push_event(GameEvent::LevelLoaded {
        generation,
        catalog,
        skipped,
    });
    ctx.push_event(GameEvent::SkipIntro);
    ctx.push_event(GameEvent::Start);
    (ctx, host)
}

/// Slab across the canal whose center sits `dz` ahead of the level origin
fn ahead(kind: EntityKind, dz: f32) -> Placement {
    Placement::new(kind, SHIP_ORIGIN + Vec3::new(0.0, 0.0, dz), Vec3::new(20.0, 20.0, 6.0))
}

#[test]
fn test_lateral_steer_moves_ship_and_camera() {
    let (mut ctx, mut host) = queued(Vec::new());
    ctx.on_pointer_delta(800.0, 0.0);
    tick(&mut ctx, &mut host, 0.016);

    let expected = 800.0 * STEER_SENSITIVITY;
    assert!((ctx.rig.ship.pos.x - expected).abs() < 1e-6);
    assert!((ctx.rig.camera.pos.x - expected).abs() < 1e-6);
    assert!((ctx.rig.volume.center.x - expected).abs() < 1e-6);

    ctx.on_pointer_delta(1.0e9, -1.0e9);
    tick(&mut ctx, &mut host, 0.016);
    assert_eq!(ctx.rig.ship.pos.x, CANAL_X_MAX);
    assert_eq!(ctx.rig.ship.pos.y, GROUND_Y);
}

#[test]
fn test_wall_contact_stops_and_damages() {
    let (mut ctx, mut host) = queued(vec![ahead(EntityKind::Wall, 5.0)]);
    tick(&mut ctx, &mut host, 0.016);

    let wall = host.spawned[0];
    assert!(ctx.collidable.contains(wall));
    assert!(!ctx.run.moving);
    assert_eq!(ctx.run.health, MAX_HEALTH - WALL_DAMAGE);

    let z = ctx.rig.ship.pos.z;
    tick(&mut ctx, &mut host, 0.016);
    assert_eq!(ctx.rig.ship.pos.z, z);
    assert_eq!(ctx.run.health, MAX_HEALTH - 2.0 * WALL_DAMAGE);
    assert_eq!(host.played(SoundClip::Impact), 1);
}

#[test]
fn test_health_powerup_is_consumed() {
    let (mut ctx, mut host) = queued(vec![ahead(EntityKind::Powerup(Effect::Health), 5.0)]);
    ctx.run.health = 98.0;
    tick(&mut ctx, &mut host, 0.016);

    let powerup = host.spawned[0];
    assert_eq!(ctx.run.health, 98.5);
    assert_eq!(ctx.run.score, PICKUP_SCORE);
    assert!(ctx.entity(powerup).is_none());
    assert!(!ctx.collidable.contains(powerup));
    assert_eq!(host.disposed, vec![powerup]);
    assert!(!ctx.run.colliding);
    assert!(ctx.run.moving);
}

#[test]
fn test_overlapping_powerups_collect_one_per_tick() {
    let (mut ctx, mut host) = queued(vec![
        ahead(EntityKind::Powerup(Effect::Points), 5.0),
        ahead(EntityKind::Powerup(Effect::Points), 5.0),
    ]);
    let (first, second) = (host.spawned[0], host.spawned[1]);
    tick(&mut ctx, &mut host, 0.016);

    assert_eq!(ctx.run.score, PICKUP_SCORE);
    assert_eq!(ctx.entities.len(), 1);
    assert_eq!(host.disposed, vec![first]);
    assert!(ctx.collidable.contains(second));

    tick(&mut ctx, &mut host, 0.016);
    assert_eq!(ctx.run.score, 2.0 * PICKUP_SCORE);
    assert!(ctx.entities.is_empty());
    assert_eq!(host.disposed, vec![first, second]);
    assert_eq!(host.played(SoundClip::PointsPickup), 2);
}

#[test]
fn test_skipped_level_entries_are_reported() {
    let json = r#"[
        { "kind": "tree", "position": [0, 0, 50], "size": [1, 1, 1] },
        { "kind": "wall", "position": [0, 0, 80], "size": [10, 10, 4] }
    ]"#;
    let (catalog, skipped) = LevelCatalog::decode(json).unwrap();
    assert_eq!(skipped.len(), 1);
    let (mut ctx, mut host) = queued_with(catalog, skipped);
    tick(&mut ctx, &mut host, 0.016);

    assert_eq!(host.errors.len(), 1);
    assert!(host.errors[0].contains("tree"));
    assert_eq!(host.spawned.len(), 1);
    assert!(ctx.ready.all());
}

#[test]
fn test_death_waits_for_feedback() {
    let (mut ctx, mut host) = queued(vec![ahead(EntityKind::Wall, 5.0)]);
    ctx.run.health = WALL_DAMAGE;
    tick(&mut ctx, &mut host, 0.016);

    assert_eq!(ctx.run.health, 0.0);
    assert!(!ctx.run.moving);
    assert_eq!(ctx.run.phase, GamePhase::Dead);

    for _ in 0..30 {
        tick(&mut ctx, &mut host, 0.016);
    }
    assert_eq!(host.played(SoundClip::Death), 1);
    assert_eq!(ctx.generation, 0);
    assert!(host.take_level_request().is_none());

    ctx.push_event(GameEvent::DeathFeedbackFinished);
    tick(&mut ctx, &mut host, 0.016);
    assert_eq!(ctx.generation, 1);
    assert_eq!(ctx.run.phase, GamePhase::Playing);
    assert_eq!(ctx.run.health, MAX_HEALTH);
    assert_eq!(ctx.last_run.map(|r| r.outcome), Some(Outcome::Died));
    assert_eq!(host.take_level_request(), Some(("corridor.json".to_string(), 1)));

    // A late acknowledgement does nothing once playing again
    ctx.push_event(GameEvent::DeathFeedbackFinished);
    tick(&mut ctx, &mut host, 0.016);
    assert_eq!(ctx.generation, 1);
}

#[test]
fn test_finish_resets_once() {
    let (mut ctx, mut host) = queued(vec![ahead(EntityKind::Finish, 5.0), ahead(EntityKind::Wall, 40.0)]);
    ctx.run.score = 20.0;
    ctx.run.health = 50.0;
    tick(&mut ctx, &mut host, 0.016);

    assert_eq!(host.played(SoundClip::Finish), 1);
    assert_eq!(ctx.generation, 1);
    assert!(ctx.entities.is_empty());
    assert_eq!(host.disposed.len(), 2);

    let summary = ctx.last_run.unwrap();
    assert_eq!(summary.outcome, Outcome::Finished);
    assert_eq!(summary.score, 20.0);

    let run = &ctx.run;
    assert_eq!(run.health, MAX_HEALTH);
    assert_eq!(run.score, 0.0);
    assert!(run.moving);
    assert!(!run.invincible);
    assert!(!run.colliding);
    assert_eq!(run.phase, GamePhase::Playing);
    assert_eq!(ctx.rig.ship.pos, SHIP_ORIGIN);

    for _ in 0..10 {
        tick(&mut ctx, &mut host, 0.016);
    }
    assert_eq!(host.played(SoundClip::Finish), 1);
    assert_eq!(host.take_level_request(), Some(("corridor.json".to_string(), 1)));
    assert!(host.take_level_request().is_none());
}

#[test]
fn test_full_demo_run_reaches_the_finish() {
    let (mut ctx, mut host) = queued(LevelCatalog::demo().placements);
    // Hug the canal ceiling, clear of every obstacle in the demo corridor
    ctx.on_pointer_delta(0.0, 1.0e9);
    let mut ticks = 0;
    while ctx.generation == 0 && ticks < 5000 {
        tick(&mut ctx, &mut host, 1.0 / 60.0);
        ticks += 1;
    }
    let summary = ctx.last_run.unwrap();
    assert_eq!(summary.outcome, Outcome::Finished);
    assert_eq!(ctx.tuning.fly_speed, FLY_SPEED);
}
