//! Entity types, colors, phases and events
//!
//! Plain data. Behaviour lives in the systems that own each collection.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::tween::{Easing, Tween};
use crate::consts::*;

/// Overall session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first start command
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// An enemy reached the player; only a reset leaves this phase
    Ended,
}

/// Unique (per session) entity handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Which collection an entity lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Projectile,
    Enemy,
    Particle,
}

/// Kind + id, enough for a renderer to track handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: EntityId,
}

impl EntityRef {
    pub fn new(kind: EntityKind, id: EntityId) -> Self {
        Self { kind, id }
    }
}

/// Fill color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Color {
    /// Linear RGB, components in [0, 1]
    Rgb([f32; 3]),
    /// Hue in degrees, saturation/lightness in percent
    Hsl {
        hue: f32,
        saturation: f32,
        lightness: f32,
    },
}

impl Color {
    pub const WHITE: Color = Color::Rgb([1.0, 1.0, 1.0]);

    /// Enemy palette: fixed saturation/lightness, variable hue
    pub fn enemy(hue: f32) -> Self {
        Color::Hsl {
            hue,
            saturation: ENEMY_SATURATION,
            lightness: ENEMY_LIGHTNESS,
        }
    }

    /// RGBA for GPU/canvas consumers
    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        let [r, g, b] = match self {
            Color::Rgb(rgb) => rgb,
            Color::Hsl {
                hue,
                saturation,
                lightness,
            } => hsl_to_rgb(hue, saturation / 100.0, lightness / 100.0),
        };
        [r, g, b, alpha]
    }
}

/// CSS color string (`hsl(...)` or `rgb(...)`)
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Color::Rgb([r, g, b]) => write!(
                f,
                "rgb({}, {}, {})",
                (r * 255.0).round() as u8,
                (g * 255.0).round() as u8,
                (b * 255.0).round() as u8
            ),
            Color::Hsl {
                hue,
                saturation,
                lightness,
            } => write!(f, "hsl({hue}, {saturation}%, {lightness}%)"),
        }
    }
}

fn hsl_to_rgb(hue: f32, s: f32, l: f32) -> [f32; 3] {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let h = hue.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    [r + m, g + m, b + m]
}

/// The player, fixed at the viewport center
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: EntityId,
    pub pos: Vec2,
    pub radius: f32,
    pub color: Color,
}

impl Player {
    pub fn new(id: EntityId, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            radius: PLAYER_RADIUS,
            color: Color::WHITE,
        }
    }
}

/// A fired shot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
}

impl Projectile {
    pub fn update(&mut self) {
        self.pos += self.vel;
    }
}

/// A homing enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
    /// Active radius shrink, if any
    #[serde(default)]
    pub shrink: Option<Tween>,
}

impl Enemy {
    /// Sample the shrink tween (if any), then move
    pub fn update(&mut self, now_ms: f64) {
        if let Some(tween) = &self.shrink {
            self.radius = tween.sample(now_ms);
            if tween.is_finished(now_ms) {
                self.shrink = None;
            }
        }
        self.pos += self.vel;
    }

    /// Start shrinking from the current radius toward `radius - amount`
    pub fn begin_shrink(&mut self, amount: f32, now_ms: f64, duration_ms: f64, easing: Easing) {
        let tween = Tween::new(self.radius, self.radius - amount, now_ms, duration_ms);
        self.shrink = Some(tween.with_easing(easing));
    }

    /// Radius once any running shrink completes
    pub fn target_radius(&self) -> f32 {
        self.shrink.as_ref().map_or(self.radius, |t| t.to)
    }
}

/// Short-lived visual effect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
    /// 1 at birth, removed once <= 0
    pub alpha: f32,
}

/// Notifications for the host (score display, modal, renderer handles)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged { total: u64 },
    GameEnded { final_score: u64 },
    EntityCreated(EntityRef),
    EntityRemoved(EntityRef),
}
