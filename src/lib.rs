//! Center Guard - simulation core for a 2D survival arcade game
//!
//! A fixed player at the viewport center shoots down enemies that spawn
//! from the edges and home on the center.
//!
//! Core modules:
//! - `sim`: Simulation (entities, spawning, collisions, game state machine)
//! - `render`: Renderer-agnostic frame descriptions
//! - `config`: Session configuration and validation

pub mod config;
pub mod render;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use render::{Drawable, Frame};

use glam::Vec2;

/// Gameplay constants fixed by the hit-resolution and movement rules
pub mod consts {
    /// Player radius
    pub const PLAYER_RADIUS: f32 = 10.0;

    /// Projectile defaults
    pub const PROJECTILE_RADIUS: f32 = 5.0;
    pub const PROJECTILE_SPEED: f32 = 5.0;

    /// Enemies move at a constant one unit per step
    pub const ENEMY_SPEED: f32 = 1.0;

    /// Overlap test counts near-touches within this distance as contact
    pub const COLLISION_TOLERANCE: f32 = 1.0;

    /// Enemies larger than this survive a hit and shrink
    pub const LETHAL_RADIUS: f32 = 20.0;
    /// Radius lost per non-lethal hit
    pub const SHRINK_AMOUNT: f32 = 10.0;
    pub const SHRINK_SCORE: u64 = 100;
    pub const KILL_SCORE: u64 = 250;

    /// Particle behaviour
    pub const PARTICLE_FRICTION: f32 = 0.99;
    pub const PARTICLE_ALPHA_STEP: f32 = 0.01;
    pub const PARTICLE_MIN_RADIUS: f32 = 1.0;
    pub const PARTICLE_MAX_RADIUS: f32 = 2.0;
    /// Per-axis spread factor for burst velocities
    pub const PARTICLE_SPREAD: f32 = 8.0;

    /// Alpha of the black overlay painted each frame (motion trails)
    pub const FADE_OVERLAY_ALPHA: f32 = 0.1;

    /// Enemy color saturation/lightness (percent)
    pub const ENEMY_SATURATION: f32 = 50.0;
    pub const ENEMY_LIGHTNESS: f32 = 50.0;
}

/// Angle (radians) of the direction from `from` to `to`.
///
/// Returns 0 when the points coincide, so callers never see NaN.
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    if d == Vec2::ZERO {
        return 0.0;
    }
    d.y.atan2(d.x)
}

/// Unit vector pointing along `angle`
#[inline]
pub fn unit_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
