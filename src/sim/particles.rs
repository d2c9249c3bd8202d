//! Hit bursts and particle decay

use glam::Vec2;
use rand::Rng;

use super::registry::{EntityMut, EntityRegistry, Visit};
use super::state::{Color, EntityKind, Particle};
use crate::consts::*;

/// Number of particles a hit on an enemy of `radius` produces
#[inline]
pub fn burst_count(radius: f32) -> usize {
    (radius * 2.0).round().max(0.0) as usize
}

/// Spawn a burst at `origin` in `color`, returning how many were created
pub fn spawn_burst<R: Rng>(
    registry: &mut EntityRegistry,
    rng: &mut R,
    origin: Vec2,
    color: Color,
    count: usize,
) -> usize {
    for _ in 0..count {
        let radius = rng.random_range(PARTICLE_MIN_RADIUS..PARTICLE_MAX_RADIUS);
        let vel = Vec2::new(burst_axis(rng), burst_axis(rng));
        let id = registry.next_entity_id();
        registry.add_particle(Particle {
            id,
            pos: origin,
            vel,
            radius,
            color,
            alpha: 1.0,
        });
    }
    count
}

/// `(u1 - 0.5) * (u2 * spread)`: roughly triangular over [-4, 4]
fn burst_axis<R: Rng>(rng: &mut R) -> f32 {
    (rng.random::<f32>() - 0.5) * (rng.random::<f32>() * PARTICLE_SPREAD)
}

/// Advance one particle; `Visit::Remove` once it has faded out
pub fn update_particle(particle: &mut Particle) -> Visit {
    particle.vel *= PARTICLE_FRICTION;
    particle.pos += particle.vel;
    particle.alpha -= PARTICLE_ALPHA_STEP;
    if particle.alpha <= 0.0 {
        Visit::Remove
    } else {
        Visit::Keep
    }
}

/// Advance every live particle, scheduling faded ones for removal.
///
/// Returns the number of particles that expired this step.
pub fn advance(registry: &mut EntityRegistry) -> usize {
    let mut expired = 0;
    registry.for_each_live(EntityKind::Particle, |entity| match entity {
        EntityMut::Particle(p) => {
            let visit = update_particle(p);
            if visit == Visit::Remove {
                expired += 1;
            }
            visit
        }
        _ => Visit::Keep,
    });
    expired
}
