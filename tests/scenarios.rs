//! End-to-end scenarios driven through the public session API.

use center_guard::GameConfig;
use center_guard::consts::*;
use center_guard::sim::{
    Color, Enemy, EntityId, EntityKind, EntityRef, GameEvent, GamePhase, GameSession,
    StepReport,
};
use glam::Vec2;

const FRAME_MS: f64 = 1000.0 / 60.0;

fn session(seed: u64) -> GameSession {
    let mut config = GameConfig::with_viewport(800.0, 600.0);
    config.seed = Some(seed);
    let mut session = GameSession::new(config).expect("valid config");
    session.start(0.0);
    session.drain_events();
    session
}

fn place_enemy(session: &mut GameSession, pos: Vec2, radius: f32) -> EntityId {
    session
        .stage_enemy(Enemy {
            id: EntityId(0),
            pos,
            vel: Vec2::ZERO,
            radius,
            color: Color::enemy(180.0),
            shrink: None,
        })
        .expect("session is running")
}

#[test]
fn kill_small_enemy() {
    let mut s = session(1);
    assert_eq!(s.score(), 0);
    let enemy = place_enemy(&mut s, Vec2::new(430.0, 300.0), 15.0);
    let projectile = s.fire(800.0, 300.0).unwrap();

    // x=405: gap 5, no hit yet
    let first = s.step(0.0);
    assert_eq!(first.hits, 0);

    // x=410: gap 0 < 1
    let report = s.step(0.0);
    assert_eq!(report.hits, 1);
    assert_eq!(report.kills, 1);
    assert_eq!(report.particles_spawned, 30);

    assert_eq!(s.score(), KILL_SCORE);
    assert!(s.registry().enemies().is_empty());
    assert!(s.registry().projectiles().is_empty());
    assert_eq!(s.registry().particles().len(), 30);
    for p in s.registry().particles() {
        assert_eq!(p.color, Color::enemy(180.0));
        assert!((p.alpha - (1.0 - PARTICLE_ALPHA_STEP)).abs() < 1e-6);
    }

    let events = s.drain_events();
    assert!(events.contains(&GameEvent::ScoreChanged { total: 250 }));
    assert!(events.contains(&GameEvent::EntityRemoved(EntityRef::new(
        EntityKind::Enemy,
        enemy
    ))));
    assert!(events.contains(&GameEvent::EntityRemoved(EntityRef::new(
        EntityKind::Projectile,
        projectile
    ))));
    let particles_created = events
        .iter()
        .filter(|e| matches!(e, GameEvent::EntityCreated(r) if r.kind == EntityKind::Particle))
        .count();
    assert_eq!(particles_created, 30);
}

#[test]
fn large_enemy_shrinks_and_survives() {
    let mut s = session(2);
    let enemy = place_enemy(&mut s, Vec2::new(440.0, 300.0), 25.0);
    s.fire(800.0, 300.0).unwrap();

    // x=405: gap 35 - 30 = 5; x=410: gap 0
    s.step(0.0);
    let report = s.step(0.0);
    assert_eq!(report.hits, 1);
    assert_eq!(report.kills, 0);
    assert_eq!(report.particles_spawned, 50);
    assert_eq!(s.score(), SHRINK_SCORE);
    assert!(s.registry().projectiles().is_empty());
    assert!(s.registry().is_live(EntityKind::Enemy, enemy));

    // Not an instantaneous jump
    s.step(FRAME_MS);
    let mid = s.registry().enemies()[0].radius;
    assert!(mid < 25.0 && mid > 15.0, "radius {mid}");

    s.step(2000.0);
    assert_eq!(s.registry().enemies()[0].radius, 15.0);
}

#[test]
fn player_contact_ends_game_and_freezes_world() {
    let mut s = session(3);
    // Gap 0 to the player's edge
    place_enemy(&mut s, Vec2::new(420.0, 300.0), 10.0);
    s.fire(0.0, 0.0).unwrap();

    let report = s.step(FRAME_MS);
    assert!(report.game_over);
    assert_eq!(s.phase(), GamePhase::Ended);
    let events = s.drain_events();
    assert!(events.contains(&GameEvent::GameEnded { final_score: 0 }));

    let frozen = s.drawables();
    for i in 0..10 {
        let report = s.frame(FRAME_MS * (i + 2) as f64 + 5000.0);
        assert!(!report.advanced);
    }
    assert_eq!(s.drawables(), frozen);
    assert_eq!(s.score(), 0);
    assert!(s.drain_events().is_empty());
}

#[test]
fn projectile_resolves_only_first_enemy() {
    let mut s = session(4);
    let first = place_enemy(&mut s, Vec2::new(470.0, 292.0), 10.0);
    let second = place_enemy(&mut s, Vec2::new(470.0, 308.0), 10.0);
    s.fire(800.0, 300.0).unwrap();

    // Both come into range together when the projectile reaches x=460
    let mut hit_step = None;
    for n in 1..=20 {
        let report = s.step(0.0);
        if report.hits > 0 {
            assert_eq!(report.hits, 1);
            assert_eq!(report.kills, 1);
            assert_eq!(report.particles_spawned, 20);
            hit_step = Some(n);
            break;
        }
    }
    assert_eq!(hit_step, Some(12));
    assert!(!s.registry().is_live(EntityKind::Enemy, first));
    assert!(s.registry().is_live(EntityKind::Enemy, second));
    assert_eq!(s.registry().enemies()[0].radius, 10.0);
    assert_eq!(s.score(), KILL_SCORE);
}

#[test]
fn projectile_shrinks_only_first_of_two_large_enemies() {
    let mut s = session(8);
    let first = place_enemy(&mut s, Vec2::new(470.0, 292.0), 25.0);
    let second = place_enemy(&mut s, Vec2::new(470.0, 308.0), 25.0);
    s.fire(800.0, 300.0).unwrap();

    // Both are within reach once the projectile gets to x=445
    let mut hit_step = None;
    for n in 1..=20 {
        let report = s.step(0.0);
        if report.hits > 0 {
            assert_eq!(report.hits, 1);
            assert_eq!(report.kills, 0);
            assert_eq!(report.particles_spawned, 50);
            hit_step = Some(n);
            break;
        }
    }
    assert_eq!(hit_step, Some(9));
    assert_eq!(s.score(), SHRINK_SCORE);
    assert!(s.registry().projectiles().is_empty());

    let enemies = s.registry().enemies();
    assert_eq!(enemies.len(), 2);
    assert_eq!(enemies[0].id, first);
    assert_eq!(enemies[0].target_radius(), 15.0);
    assert!(enemies[0].shrink.is_some());
    assert_eq!(enemies[1].id, second);
    assert_eq!(enemies[1].radius, 25.0);
    assert!(enemies[1].shrink.is_none());

    let scores: Vec<_> = s
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::ScoreChanged { .. }))
        .collect();
    assert_eq!(scores, vec![GameEvent::ScoreChanged { total: 100 }]);
}

#[test]
fn two_projectiles_on_one_shrinking_enemy_in_one_step() {
    let mut s = session(9);
    let enemy = place_enemy(&mut s, Vec2::new(460.0, 300.0), 30.0);
    // Same path, so both arrive in the same step
    s.fire(800.0, 300.0).unwrap();
    s.fire(800.0, 300.0).unwrap();

    let mut report = StepReport::default();
    for _ in 0..20 {
        report = s.step(0.0);
        if report.hits > 0 {
            break;
        }
    }
    assert_eq!(report.hits, 2);
    assert_eq!(report.kills, 0);
    assert_eq!(report.particles_spawned, 120);
    assert_eq!(s.score(), 2 * SHRINK_SCORE);
    assert!(s.registry().projectiles().is_empty());
    assert!(s.registry().is_live(EntityKind::Enemy, enemy));

    // The second hit restarts the shrink from the same radius
    assert_eq!(s.registry().enemies()[0].target_radius(), 30.0 - SHRINK_AMOUNT);
    s.step(2000.0);
    assert_eq!(s.registry().enemies()[0].radius, 20.0);
    assert!(s.registry().enemies()[0].shrink.is_none());
}

#[test]
fn staging_enemies_never_touches_the_player() {
    let mut s = session(10);
    let player = s.player().unwrap().id;
    for i in 0..5 {
        place_enemy(&mut s, Vec2::new(50.0 + 10.0 * i as f32, 50.0), 5.0);
    }
    assert_eq!(s.player().unwrap().id, player);

    // With no way to take the player away, an unopposed run still ends
    let mut now = 0.0;
    let mut frames = 0;
    while s.phase() == GamePhase::Running {
        now += FRAME_MS;
        s.frame(now);
        frames += 1;
        assert!(frames < 60 * 60);
    }
    assert_eq!(s.phase(), GamePhase::Ended);

    // Only a running session accepts staged enemies
    let mut idle = GameSession::new(GameConfig::with_viewport(800.0, 600.0)).unwrap();
    assert!(idle.stage_enemy(s.registry().enemies()[0].clone()).is_none());
}

#[test]
fn every_projectile_leaving_together_is_removed_once() {
    let mut s = session(5);
    let targets = [
        (0.0, 300.0),
        (800.0, 300.0),
        (400.0, 0.0),
        (400.0, 600.0),
        (0.0, 0.0),
        (800.0, 600.0),
    ];
    let ids: Vec<_> = targets
        .iter()
        .map(|&(x, y)| s.fire(x, y).unwrap())
        .collect();
    s.drain_events();

    for _ in 0..200 {
        s.step(0.0);
    }
    assert!(s.registry().projectiles().is_empty());

    let events = s.drain_events();
    for id in ids {
        let removed = events
            .iter()
            .filter(|e| {
                **e == GameEvent::EntityRemoved(EntityRef::new(EntityKind::Projectile, id))
            })
            .count();
        assert_eq!(removed, 1);
    }
}

#[test]
fn spawner_stops_when_game_ends() {
    let mut s = session(6);
    let mut now = 0.0;
    let mut frames = 0;
    while s.phase() == GamePhase::Running {
        now += FRAME_MS;
        s.frame(now);
        frames += 1;
        assert!(frames < 60 * 60, "an unopposed enemy should reach the player");
    }
    assert!(!s.spawner_running());

    // Every enemy spawned so far moved at unit speed
    for e in s.registry().enemies() {
        assert!((e.vel.length() - 1.0).abs() < 1e-5);
        assert!((5.0..=50.0).contains(&e.radius));
    }

    let enemies = s.registry().enemies().len();
    s.drain_events();
    for _ in 0..600 {
        now += FRAME_MS;
        s.frame(now);
    }
    assert_eq!(s.registry().enemies().len(), enemies);
    assert!(s.drain_events().is_empty());
}

#[test]
fn reset_starts_fresh_session() {
    let mut s = session(7);
    place_enemy(&mut s, Vec2::new(430.0, 300.0), 15.0);
    s.fire(800.0, 300.0).unwrap();
    s.step(0.0);
    s.step(0.0);
    assert_eq!(s.score(), KILL_SCORE);

    s.reset(100.0);
    assert_eq!(s.phase(), GamePhase::Running);
    assert_eq!(s.score(), 0);
    assert!(s.registry().particles().is_empty());
    assert_eq!(s.drawables().len(), 1);
    assert!(
        s.drain_events()
            .contains(&GameEvent::ScoreChanged { total: 0 })
    );
}

#[test]
fn same_seed_same_world() {
    let run = |seed| {
        let mut s = session(seed);
        for i in 1..=300 {
            s.frame(i as f64 * FRAME_MS);
        }
        s.drawables()
    };
    assert_eq!(run(99), run(99));
}
