// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Entity set snapshots
//!
//! An entity set is the workload an entity-bound system iterates: an ordered,
//! contiguous view of entity handles produced by a registry query. Systems
//! own their set, which keeps its contents structurally stable while a
//! dispatch against it is in flight; refreshing membership means building a
//! new set and swapping it in between cycles.

use crate::ecs::Entity;

/// Ordered, sliceable collection of entity handles
///
/// The view is contiguous, so any `[start, end)` partition of `0..count()`
/// selects a well-defined slice of entities.
///
/// # Examples
///
/// ```
/// use update_engine::ecs::{Entity, EntitySet};
///
/// let set = EntitySet::new(vec![Entity::new(0, 0), Entity::new(1, 0)]);
/// assert_eq!(set.count(), 2);
/// assert_eq!(set.view()[1].index(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EntitySet {
    entities: Vec<Entity>,
}

impl EntitySet {
    /// Create an entity set from an ordered list of handles
    pub fn new(entities: Vec<Entity>) -> Self {
        EntitySet { entities }
    }

    /// Get the number of entities in the set
    pub fn count(&self) -> usize {
        self.entities.len()
    }

    /// Check if the set contains no entities
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Get the ordered view of the entities in the set
    pub fn view(&self) -> &[Entity] {
        &self.entities
    }
}

impl From<Vec<Entity>> for EntitySet {
    fn from(entities: Vec<Entity>) -> Self {
        EntitySet::new(entities)
    }
}
