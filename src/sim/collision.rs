//! Circle overlap test
//!
//! One predicate for both player-vs-enemy and projectile-vs-enemy. Pairwise
//! O(P x E) per step, fine for a few dozen live entities.

use glam::Vec2;

use crate::consts::COLLISION_TOLERANCE;

/// Gap between two circle edges (negative when overlapping)
#[inline]
pub fn edge_gap(center_a: Vec2, radius_a: f32, center_b: Vec2, radius_b: f32) -> f32 {
    center_a.distance(center_b) - radius_a - radius_b
}

/// True when the circles overlap or come within the collision tolerance
#[inline]
pub fn collides(center_a: Vec2, radius_a: f32, center_b: Vec2, radius_b: f32) -> bool {
    edge_gap(center_a, radius_a, center_b, radius_b) < COLLISION_TOLERANCE
}
