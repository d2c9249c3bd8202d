//! Simulation module
//!
//! All gameplay logic lives here. No rendering or platform dependencies:
//! - The host supplies a millisecond clock with every frame
//! - One seeded RNG per session
//! - Stable iteration order (insertion order within each collection)

pub mod collision;
pub mod game;
pub mod particles;
pub mod registry;
pub mod score;
pub mod spawner;
pub mod state;
pub mod tween;

pub use collision::collides;
pub use game::{GameSession, StepReport};
pub use registry::{EnemySink, EntityMut, EntityRegistry, Visit};
pub use score::ScoreTracker;
pub use spawner::{SpawnScheduler, spawn_enemy};
pub use state::{
    Color, Enemy, EntityId, EntityKind, EntityRef, GameEvent, GamePhase, Particle, Player,
    Projectile,
};
pub use tween::{Easing, Tween};
