//! Live entity collections
//!
//! Removal is deferred: `remove` only records the request, and the entity is
//! skipped by `is_live`/`for_each_live` until `apply_removals` compacts the
//! collections at the end of a step. Iteration never shifts indices under
//! an active pass.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::state::{Enemy, EntityId, EntityKind, EntityRef, Particle, Player, Projectile};

/// Mutable view of one entity handed to `for_each_live`
pub enum EntityMut<'a> {
    Player(&'a mut Player),
    Projectile(&'a mut Projectile),
    Enemy(&'a mut Enemy),
    Particle(&'a mut Particle),
}

/// What the visitor wants done with the entity it just saw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Keep,
    Remove,
}

/// Append-only access for producers that must not touch other entities
pub trait EnemySink {
    /// Allocate an id for an enemy about to be pushed
    fn reserve_id(&mut self) -> EntityId;
    fn push_enemy(&mut self, enemy: Enemy);
}

/// Owner of every live entity in a session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityRegistry {
    player: Option<Player>,
    projectiles: Vec<Projectile>,
    enemies: Vec<Enemy>,
    particles: Vec<Particle>,
    /// Removal requests not yet applied
    pending: HashSet<EntityRef>,
    /// Created since the last drain
    #[serde(skip)]
    created: Vec<EntityRef>,
    next_id: u32,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn set_player(&mut self, player: Player) {
        self.created.push(EntityRef::new(EntityKind::Player, player.id));
        self.player = Some(player);
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn add_projectile(&mut self, projectile: Projectile) {
        self.created
            .push(EntityRef::new(EntityKind::Projectile, projectile.id));
        self.projectiles.push(projectile);
    }

    pub fn add_enemy(&mut self, enemy: Enemy) {
        self.created.push(EntityRef::new(EntityKind::Enemy, enemy.id));
        self.enemies.push(enemy);
    }

    pub fn add_particle(&mut self, particle: Particle) {
        self.created
            .push(EntityRef::new(EntityKind::Particle, particle.id));
        self.particles.push(particle);
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// In-place access for the session; structural changes go through add/remove
    pub(crate) fn enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    /// Request removal; idempotent, applied by `apply_removals`
    pub fn remove(&mut self, kind: EntityKind, id: EntityId) {
        self.pending.insert(EntityRef::new(kind, id));
    }

    /// Present and not scheduled for removal
    pub fn is_live(&self, kind: EntityKind, id: EntityId) -> bool {
        let present = match kind {
            EntityKind::Player => self.player.as_ref().is_some_and(|p| p.id == id),
            EntityKind::Projectile => self.projectiles.iter().any(|p| p.id == id),
            EntityKind::Enemy => self.enemies.iter().any(|e| e.id == id),
            EntityKind::Particle => self.particles.iter().any(|p| p.id == id),
        };
        present && !self.is_pending(kind, id)
    }

    #[inline]
    pub fn is_pending(&self, kind: EntityKind, id: EntityId) -> bool {
        self.pending.contains(&EntityRef::new(kind, id))
    }

    /// Visit each live member of `kind` present when the call began.
    ///
    /// Members removed earlier (this step) are skipped; a `Visit::Remove`
    /// result defers removal of the visited entity.
    pub fn for_each_live<F>(&mut self, kind: EntityKind, mut visit: F)
    where
        F: FnMut(EntityMut<'_>) -> Visit,
    {
        let mut removed: Vec<EntityId> = Vec::new();
        let pending = &self.pending;
        let skip = |id: EntityId| pending.contains(&EntityRef::new(kind, id));

        match kind {
            EntityKind::Player => {
                if let Some(player) = self.player.as_mut().filter(|p| !skip(p.id)) {
                    let id = player.id;
                    if visit(EntityMut::Player(player)) == Visit::Remove {
                        removed.push(id);
                    }
                }
            }
            EntityKind::Projectile => {
                for p in self.projectiles.iter_mut().filter(|p| !skip(p.id)) {
                    let id = p.id;
                    if visit(EntityMut::Projectile(p)) == Visit::Remove {
                        removed.push(id);
                    }
                }
            }
            EntityKind::Enemy => {
                for e in self.enemies.iter_mut().filter(|e| !skip(e.id)) {
                    let id = e.id;
                    if visit(EntityMut::Enemy(e)) == Visit::Remove {
                        removed.push(id);
                    }
                }
            }
            EntityKind::Particle => {
                for p in self.particles.iter_mut().filter(|p| !skip(p.id)) {
                    let id = p.id;
                    if visit(EntityMut::Particle(p)) == Visit::Remove {
                        removed.push(id);
                    }
                }
            }
        }

        for id in removed {
            self.remove(kind, id);
        }
    }

    /// Compact all collections, returning what was actually removed
    pub fn apply_removals(&mut self) -> Vec<EntityRef> {
        if self.pending.is_empty() {
            return Vec::new();
        }
        let pending = std::mem::take(&mut self.pending);
        let doomed = |kind: EntityKind, id: EntityId| pending.contains(&EntityRef::new(kind, id));

        let mut removed = Vec::with_capacity(pending.len());
        let mut track = |kind: EntityKind, id: EntityId| {
            if doomed(kind, id) {
                removed.push(EntityRef::new(kind, id));
                false
            } else {
                true
            }
        };

        let player_doomed = self
            .player
            .as_ref()
            .is_some_and(|p| !track(EntityKind::Player, p.id));
        if player_doomed {
            self.player = None;
        }
        self.projectiles
            .retain(|p| track(EntityKind::Projectile, p.id));
        self.enemies.retain(|e| track(EntityKind::Enemy, e.id));
        self.particles.retain(|p| track(EntityKind::Particle, p.id));
        removed
    }

    /// Take creation notices accumulated since the last call
    pub fn drain_created(&mut self) -> Vec<EntityRef> {
        std::mem::take(&mut self.created)
    }

    /// Empty every collection, returning refs of everything dropped
    pub fn clear(&mut self) -> Vec<EntityRef> {
        let mut removed = Vec::new();
        if let Some(player) = self.player.take() {
            removed.push(EntityRef::new(EntityKind::Player, player.id));
        }
        removed.extend(
            self.projectiles
                .drain(..)
                .map(|p| EntityRef::new(EntityKind::Projectile, p.id)),
        );
        removed.extend(
            self.enemies
                .drain(..)
                .map(|e| EntityRef::new(EntityKind::Enemy, e.id)),
        );
        removed.extend(
            self.particles
                .drain(..)
                .map(|p| EntityRef::new(EntityKind::Particle, p.id)),
        );
        self.pending.clear();
        // Entities never reported as created need no removal notice either
        let unannounced = std::mem::take(&mut self.created);
        removed.retain(|r| !unannounced.contains(r));
        removed
    }
}

impl EnemySink for EntityRegistry {
    fn reserve_id(&mut self) -> EntityId {
        self.next_entity_id()
    }

    fn push_enemy(&mut self, enemy: Enemy) {
        self.add_enemy(enemy);
    }
}
