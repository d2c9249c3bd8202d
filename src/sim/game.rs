//! Session state machine and the per-frame step
//!
//! `GameSession` owns every piece of mutable state (registry, score, RNG,
//! spawner, pending events). The host drives it with `frame` (or with
//! `poll_spawner` + `step` separately) and reads back events and drawables.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::collides;
use super::particles::{self, burst_count, spawn_burst};
use super::registry::{EnemySink, EntityMut, EntityRegistry, Visit};
use super::score::ScoreTracker;
use super::spawner::SpawnScheduler;
use super::state::{
    Enemy, EntityId, EntityKind, EntityRef, GameEvent, GamePhase, Player, Projectile,
};
use crate::config::{ConfigError, GameConfig};
use crate::consts::*;
use crate::render::{Drawable, Frame};
use crate::{angle_between, unit_from_angle};

/// Summary of one step, mostly for hosts and tests
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// False when the step was rejected (not Running)
    pub advanced: bool,
    pub hits: usize,
    pub kills: usize,
    pub particles_spawned: usize,
    pub game_over: bool,
}

/// One game session and its state machine
#[derive(Debug)]
pub struct GameSession {
    config: GameConfig,
    phase: GamePhase,
    registry: EntityRegistry,
    score: ScoreTracker,
    spawner: SpawnScheduler,
    rng: Pcg32,
    events: Vec<GameEvent>,
    /// Steps taken since the last (re)start
    steps: u64,
}

impl GameSession {
    /// Validate `config` and build an Idle session
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        log::info!(
            "New session {}x{} (seed {seed})",
            config.viewport.width,
            config.viewport.height
        );
        Ok(Self {
            spawner: SpawnScheduler::new(config.spawn),
            config,
            phase: GamePhase::Idle,
            registry: EntityRegistry::new(),
            score: ScoreTracker::new(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            steps: 0,
        })
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score.current()
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn player(&self) -> Option<&Player> {
        self.registry.player()
    }

    pub fn spawner_running(&self) -> bool {
        self.spawner.is_running()
    }

    /// Idle/Ended -> Running with a fresh world. Ignored while Running.
    pub fn start(&mut self, now_ms: f64) {
        if self.phase == GamePhase::Running {
            log::debug!("start ignored: already running");
            return;
        }
        self.init(now_ms);
    }

    /// Re-initialize into Running from any phase
    pub fn reset(&mut self, now_ms: f64) {
        self.init(now_ms);
    }

    fn init(&mut self, now_ms: f64) {
        for removed in self.registry.clear() {
            self.events.push(GameEvent::EntityRemoved(removed));
        }
        let id = self.registry.next_entity_id();
        self.registry
            .set_player(Player::new(id, self.config.viewport.center()));

        self.score = ScoreTracker::new();
        self.events.push(GameEvent::ScoreChanged { total: 0 });
        self.steps = 0;

        self.spawner.start(now_ms);
        self.set_phase(GamePhase::Running);
        self.flush_created();
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!("Phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    /// Fire from the center toward a screen-space target.
    ///
    /// Returns the new projectile's id, or `None` when not Running or the
    /// target is not a finite point.
    pub fn fire(&mut self, target_x: f32, target_y: f32) -> Option<EntityId> {
        if self.phase != GamePhase::Running {
            log::debug!("fire ignored in {:?}", self.phase);
            return None;
        }
        if !(target_x.is_finite() && target_y.is_finite()) {
            log::warn!("fire ignored: target ({target_x}, {target_y}) is not finite");
            return None;
        }
        let center = self.config.viewport.center();
        let color = self.player()?.color;
        let angle = angle_between(center, Vec2::new(target_x, target_y));

        let id = self.registry.next_entity_id();
        self.registry.add_projectile(Projectile {
            id,
            pos: center,
            vel: unit_from_angle(angle) * PROJECTILE_SPEED,
            radius: PROJECTILE_RADIUS,
            color,
        });
        self.flush_created();
        Some(id)
    }

    /// Append an enemy the way the spawner does, with a fresh id.
    ///
    /// Lets hosts and tests place enemies deterministically. The enemy's own
    /// `id` is replaced. Returns `None` when not Running.
    pub fn stage_enemy(&mut self, mut enemy: Enemy) -> Option<EntityId> {
        if self.phase != GamePhase::Running {
            return None;
        }
        enemy.id = self.registry.reserve_id();
        let id = enemy.id;
        self.registry.push_enemy(enemy);
        self.flush_created();
        Some(id)
    }

    /// Let the spawner fire for every interval elapsed up to `now_ms`
    pub fn poll_spawner(&mut self, now_ms: f64) -> usize {
        if self.phase != GamePhase::Running {
            return 0;
        }
        let spawned = self.spawner.poll(
            now_ms,
            &self.config.viewport,
            &mut self.rng,
            &mut self.registry,
        );
        if spawned > 0 {
            log::trace!("Spawned {spawned} enemies");
            self.flush_created();
        }
        spawned
    }

    /// Host frame callback: spawner first, then one simulation step
    pub fn frame(&mut self, now_ms: f64) -> StepReport {
        self.poll_spawner(now_ms);
        self.step(now_ms)
    }

    /// Advance the simulation by one step. No-op unless Running.
    pub fn step(&mut self, now_ms: f64) -> StepReport {
        let mut report = StepReport::default();
        if self.phase != GamePhase::Running {
            return report;
        }
        report.advanced = true;
        self.steps += 1;

        self.update_projectiles();

        if self.update_enemies(now_ms) {
            self.end_game();
            report.game_over = true;
            self.finish_step();
            return report;
        }

        self.resolve_hits(now_ms, &mut report);

        particles::advance(&mut self.registry);

        self.finish_step();
        report
    }

    /// Move projectiles; schedule the ones that left the viewport
    fn update_projectiles(&mut self) {
        let viewport = self.config.viewport;
        self.registry
            .for_each_live(EntityKind::Projectile, |entity| match entity {
                EntityMut::Projectile(p) => {
                    p.update();
                    if viewport.circle_outside(p.pos, p.radius) {
                        Visit::Remove
                    } else {
                        Visit::Keep
                    }
                }
                _ => Visit::Keep,
            });
    }

    /// Move enemies; true when one reached the player or the player is gone
    fn update_enemies(&mut self, now_ms: f64) -> bool {
        let Some((player_pos, player_radius)) = self.player().map(|p| (p.pos, p.radius)) else {
            log::warn!("No player while running; ending session");
            return true;
        };

        let mut contact = false;
        self.registry
            .for_each_live(EntityKind::Enemy, |entity| {
                // Once the player is touched nothing else moves this step
                if contact {
                    return Visit::Keep;
                }
                if let EntityMut::Enemy(e) = entity {
                    e.update(now_ms);
                    if collides(player_pos, player_radius, e.pos, e.radius) {
                        contact = true;
                    }
                }
                Visit::Keep
            });
        contact
    }

    /// Pairwise projectile/enemy checks with first-match-wins per projectile
    fn resolve_hits(&mut self, now_ms: f64, report: &mut StepReport) {
        let shrink_ms = self.config.shrink_duration_ms;
        let easing = self.config.easing;

        for ei in 0..self.registry.enemies().len() {
            let enemy = &self.registry.enemies()[ei];
            let enemy_id = enemy.id;
            if self.registry.is_pending(EntityKind::Enemy, enemy_id) {
                continue;
            }

            for pi in 0..self.registry.projectiles().len() {
                let projectile = &self.registry.projectiles()[pi];
                let projectile_id = projectile.id;
                let projectile_pos = projectile.pos;
                if self.registry.is_pending(EntityKind::Projectile, projectile_id) {
                    continue;
                }

                let enemy = &self.registry.enemies()[ei];
                if !collides(projectile_pos, projectile.radius, enemy.pos, enemy.radius) {
                    continue;
                }

                // Consume the projectile so no later pair can match it
                let (radius, color) = (enemy.radius, enemy.color);
                self.registry.remove(EntityKind::Projectile, projectile_id);
                report.hits += 1;
                report.particles_spawned += spawn_burst(
                    &mut self.registry,
                    &mut self.rng,
                    projectile_pos,
                    color,
                    burst_count(radius),
                );

                if radius > LETHAL_RADIUS {
                    self.registry.enemies_mut()[ei].begin_shrink(
                        SHRINK_AMOUNT,
                        now_ms,
                        shrink_ms,
                        easing,
                    );
                    self.award(SHRINK_SCORE);
                } else {
                    self.registry.remove(EntityKind::Enemy, enemy_id);
                    self.award(KILL_SCORE);
                    report.kills += 1;
                    break;
                }
            }
        }
    }

    fn award(&mut self, points: u64) {
        let total = self.score.add(points);
        self.events.push(GameEvent::ScoreChanged { total });
    }

    fn end_game(&mut self) {
        self.spawner.stop();
        self.set_phase(GamePhase::Ended);
        let final_score = self.score.current();
        log::info!("Game over, final score {final_score}");
        self.events.push(GameEvent::GameEnded { final_score });
    }

    /// Apply deferred removals and publish lifecycle notices
    fn finish_step(&mut self) {
        self.flush_created();
        for removed in self.registry.apply_removals() {
            self.events.push(GameEvent::EntityRemoved(removed));
        }
    }

    fn flush_created(&mut self) {
        let created = self.registry.drain_created();
        self.events
            .extend(created.into_iter().map(GameEvent::EntityCreated));
    }

    /// Take all events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Everything live, in draw order: player, projectiles, enemies, particles
    pub fn drawables(&self) -> Vec<Drawable> {
        let reg = &self.registry;
        let mut out = Vec::with_capacity(
            1 + reg.projectiles().len() + reg.enemies().len() + reg.particles().len(),
        );
        if let Some(p) = reg.player() {
            out.push(Drawable::solid(
                EntityRef::new(EntityKind::Player, p.id),
                p.pos,
                p.radius,
                p.color,
            ));
        }
        out.extend(reg.projectiles().iter().map(|p| {
            Drawable::solid(
                EntityRef::new(EntityKind::Projectile, p.id),
                p.pos,
                p.radius,
                p.color,
            )
        }));
        out.extend(reg.enemies().iter().map(|e| {
            Drawable::solid(
                EntityRef::new(EntityKind::Enemy, e.id),
                e.pos,
                e.radius,
                e.color,
            )
        }));
        out.extend(reg.particles().iter().map(|p| Drawable {
            entity: EntityRef::new(EntityKind::Particle, p.id),
            center: p.pos,
            radius: p.radius,
            color: p.color,
            alpha: p.alpha.clamp(0.0, 1.0),
        }));
        out
    }

    /// Drawables plus the per-frame fade overlay
    pub fn render_frame(&self) -> Frame {
        Frame {
            fade_overlay: FADE_OVERLAY_ALPHA,
            drawables: self.drawables(),
        }
    }
}
