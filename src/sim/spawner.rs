//! Periodic enemy spawner
//!
//! Runs on the session clock, independent of the frame rate. Polled by the
//! host on the simulation thread; each due firing appends one enemy through
//! an [`EnemySink`], so the spawner can never touch existing entities.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::registry::EnemySink;
use super::state::{Color, Enemy, EntityId};
use crate::config::{SpawnConfig, Viewport};
use crate::consts::ENEMY_SPEED;
use crate::{angle_between, unit_from_angle};

/// Timer state for the enemy spawner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnScheduler {
    config: SpawnConfig,
    /// Clock time of the next firing; `None` while stopped
    next_fire_ms: Option<f64>,
}

impl SpawnScheduler {
    pub fn new(config: SpawnConfig) -> Self {
        Self {
            config,
            next_fire_ms: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.next_fire_ms.is_some()
    }

    /// Arm the timer; the first enemy arrives one interval after `now_ms`
    pub fn start(&mut self, now_ms: f64) {
        self.next_fire_ms = Some(now_ms + self.config.interval_ms);
        log::debug!("Spawner started (every {} ms)", self.config.interval_ms);
    }

    /// Disarm the timer; no further firings until `start`
    pub fn stop(&mut self) {
        if self.next_fire_ms.take().is_some() {
            log::debug!("Spawner stopped");
        }
    }

    /// Fire once for every interval elapsed up to `now_ms`.
    ///
    /// Returns the number of enemies spawned.
    pub fn poll<R: Rng, S: EnemySink + ?Sized>(
        &mut self,
        now_ms: f64,
        viewport: &Viewport,
        rng: &mut R,
        sink: &mut S,
    ) -> usize {
        let Some(mut due) = self.next_fire_ms else {
            return 0;
        };

        let mut spawned = 0;
        while due <= now_ms {
            let id = sink.reserve_id();
            sink.push_enemy(spawn_enemy(id, viewport, &self.config, rng));
            due += self.config.interval_ms;
            spawned += 1;
        }
        self.next_fire_ms = Some(due);
        spawned
    }
}

/// Build one enemy just outside a random viewport edge, aimed at the center
pub fn spawn_enemy<R: Rng>(
    id: EntityId,
    viewport: &Viewport,
    config: &SpawnConfig,
    rng: &mut R,
) -> Enemy {
    let radius = if config.max_radius > config.min_radius {
        rng.random_range(config.min_radius..=config.max_radius)
    } else {
        config.min_radius
    };

    let pos = if rng.random_bool(0.5) {
        // Left or right edge
        let x = if rng.random_bool(0.5) {
            -radius
        } else {
            viewport.width + radius
        };
        Vec2::new(x, rng.random::<f32>() * viewport.height)
    } else {
        // Top or bottom edge
        let y = if rng.random_bool(0.5) {
            -radius
        } else {
            viewport.height + radius
        };
        Vec2::new(rng.random::<f32>() * viewport.width, y)
    };

    let hue = rng.random_range(0.0..360.0);
    let angle = angle_between(pos, viewport.center());

    Enemy {
        id,
        pos,
        vel: unit_from_angle(angle) * ENEMY_SPEED,
        radius,
        color: Color::enemy(hue),
        shrink: None,
    }
}
