//! Center Guard headless driver
//!
//! Runs one session at a simulated 60 Hz with a simple auto-aim and logs the
//! outcome. Optional first argument: path to a JSON config.
//! Set `RUST_LOG=info` (or `debug`) to see session output.

use center_guard::GameConfig;
use center_guard::sim::{GameEvent, GameSession, StepReport};

/// Simulated frame length (60 Hz)
const FRAME_MS: f64 = 1000.0 / 60.0;
/// Frames between auto-aim shots
const FIRE_EVERY: u64 = 12;
/// Give up after five simulated minutes
const MAX_FRAMES: u64 = 60 * 60 * 5;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Center Guard (headless) starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => match GameConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Bad config {path}: {e}");
                std::process::exit(2);
            }
        },
        None => GameConfig::default(),
    };

    let mut session = match GameSession::new(config) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Cannot start session: {e}");
            std::process::exit(2);
        }
    };

    let mut now = 0.0;
    session.start(now);

    let mut totals = StepReport::default();
    let mut frames = 0;
    let mut final_score = None;
    while frames < MAX_FRAMES && final_score.is_none() {
        frames += 1;
        now += FRAME_MS;

        if frames.is_multiple_of(FIRE_EVERY) {
            if let Some(target) = nearest_enemy(&session) {
                session.fire(target.x, target.y);
            }
        }

        let report = session.frame(now);
        totals.hits += report.hits;
        totals.kills += report.kills;
        totals.particles_spawned += report.particles_spawned;

        for event in session.drain_events() {
            match event {
                GameEvent::ScoreChanged { total } => log::debug!("Score: {total}"),
                GameEvent::GameEnded { final_score: score } => final_score = Some(score),
                GameEvent::EntityCreated(_) | GameEvent::EntityRemoved(_) => {}
            }
        }
    }

    let seconds = now / 1000.0;
    match final_score {
        Some(score) => println!(
            "Game over after {seconds:.1}s: score {score}, {} hits, {} kills, {} particles",
            totals.hits, totals.kills, totals.particles_spawned
        ),
        None => println!(
            "Survived {seconds:.1}s: score {}, {} hits, {} kills",
            session.score(),
            totals.hits,
            totals.kills
        ),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web hosts drive GameSession directly; no entry point needed
}

/// Aim point of the enemy closest to the player, if any
fn nearest_enemy(session: &GameSession) -> Option<glam::Vec2> {
    let center = session.player()?.pos;
    session
        .registry()
        .enemies()
        .iter()
        .min_by(|a, b| {
            a.pos
                .distance_squared(center)
                .partial_cmp(&b.pos.distance_squared(center))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|e| e.pos)
}
