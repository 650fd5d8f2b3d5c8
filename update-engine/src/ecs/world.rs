//! World management
//!
//! The World is the registry that owns entity lifecycles: it hands out
//! handles, recycles indices with bumped generations, and snapshots the
//! alive population into entity sets for systems to iterate.

use crate::ecs::{Entity, EntitySet};
use std::collections::HashSet;

/// Entity lifecycle registry
///
/// World manages entity creation and destruction and serves as the source
/// of the entity sets that systems update. Component data lives outside the
/// world, in per-type columns addressed by entity index.
pub struct World {
    next_index: u32,
    generations: Vec<u32>,
    alive_entities: HashSet<Entity>,
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        World {
            next_index: 0,
            generations: Vec::new(),
            alive_entities: HashSet::new(),
        }
    }

    /// Create a new entity
    pub fn create_entity(&mut self) -> Entity {
        let index = self.next_index;
        self.next_index += 1;

        // Extend generations vector if needed
        if index as usize >= self.generations.len() {
            self.generations.resize(index as usize + 1, 0);
        }

        let entity = Entity::new(index, self.generations[index as usize]);
        self.alive_entities.insert(entity);

        entity
    }

    /// Destroy an entity
    ///
    /// This increments the generation counter to invalidate old references
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        if self.alive_entities.remove(&entity) {
            let index = entity.index();
            if index < self.generations.len() {
                self.generations[index] = self.generations[index].wrapping_add(1);
            }
            true
        } else {
            false
        }
    }

    /// Check if an entity is alive
    pub fn is_entity_alive(&self, entity: Entity) -> bool {
        self.alive_entities.contains(&entity)
    }

    /// Get the number of alive entities
    pub fn entity_count(&self) -> usize {
        self.alive_entities.len()
    }

    /// Clear all entities
    pub fn clear(&mut self) {
        self.alive_entities.clear();
        self.generations.clear();
        self.next_index = 0;
    }

    /// Get an iterator over all alive entities
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.alive_entities.iter()
    }

    /// Snapshot the alive entities into an ordered entity set
    ///
    /// Entities are ordered by index so repeated snapshots of the same
    /// population produce identical views.
    pub fn entity_set(&self) -> EntitySet {
        let mut entities: Vec<Entity> = self.alive_entities.iter().copied().collect();
        entities.sort_unstable();
        EntitySet::new(entities)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
