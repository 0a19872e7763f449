//! Owning entity store with role index sets
//!
//! Every arena entity is owned by exactly one map keyed by a stable,
//! never-reused id. Mobs, bullets and power-ups are additionally indexed in
//! role sets for filtered iteration. Insertion and removal keep the map and
//! the role sets in step, so a role set never names a dead entity.

use std::collections::{BTreeMap, BTreeSet};

use super::state::{Entity, EntityKind};

/// Stable entity handle (monotonic, never reused within a state)
pub type EntityId = u32;

/// Role subsets an entity can belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Mob,
    Bullet,
    PowerUp,
}

impl Role {
    fn of(kind: &EntityKind) -> Option<Role> {
        match kind {
            EntityKind::Mob(_) => Some(Role::Mob),
            EntityKind::Bullet => Some(Role::Bullet),
            EntityKind::PowerUp(_) => Some(Role::PowerUp),
            EntityKind::Explosion(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Arena {
    entities: BTreeMap<EntityId, Entity>,
    mobs: BTreeSet<EntityId>,
    bullets: BTreeSet<EntityId>,
    powerups: BTreeSet<EntityId>,
    next_id: EntityId,
}

impl Arena {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn role_set_mut(&mut self, role: Role) -> &mut BTreeSet<EntityId> {
        match role {
            Role::Mob => &mut self.mobs,
            Role::Bullet => &mut self.bullets,
            Role::PowerUp => &mut self.powerups,
        }
    }

    /// Take ownership of `entity`, assign its id and index its role
    pub fn insert(&mut self, mut entity: Entity) -> EntityId {
        let id = self.next_entity_id();
        entity.id = id;
        if let Some(role) = Role::of(&entity.kind) {
            self.role_set_mut(role).insert(id);
        }
        self.entities.insert(id, entity);
        id
    }

    /// Destroy an entity, dropping it from every role set
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.remove(&id)?;
        if let Some(role) = Role::of(&entity.kind) {
            self.role_set_mut(role).remove(&id);
        }
        Some(entity)
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.mobs.clear();
        self.bullets.clear();
        self.powerups.clear();
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Whether `id` still refers to a live entity
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// All live entities in id order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Ids of all live entities in id order (a snapshot, safe to mutate against)
    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }

    /// Snapshot of a role subset in id order
    pub fn role_ids(&self, role: Role) -> Vec<EntityId> {
        let set = match role {
            Role::Mob => &self.mobs,
            Role::Bullet => &self.bullets,
            Role::PowerUp => &self.powerups,
        };
        set.iter().copied().collect()
    }

    pub fn mob_count(&self) -> usize {
        self.mobs.len()
    }

    pub fn bullet_count(&self) -> usize {
        self.bullets.len()
    }

    pub fn powerup_count(&self) -> usize {
        self.powerups.len()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
