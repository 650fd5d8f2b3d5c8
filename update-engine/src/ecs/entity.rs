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
//! Entity management
//!
//! Entities are unique identifiers that represent objects processed by
//! update systems. They are lightweight handles into component columns:
//! the index addresses a dense storage slot, the generation invalidates
//! stale references after the slot is recycled.

use std::fmt;

/// Entity handle with generational index support for safe references
///
/// An entity is only guaranteed stable for the duration of one update cycle;
/// holding it across cycles requires re-checking liveness against the owning
/// world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    /// Create a new entity with the given index and generation
    pub fn new(index: u32, generation: u32) -> Self {
        Entity { index, generation }
    }

    /// Get the dense storage index of this entity
    ///
    /// Distinct live entities always have distinct indices; component
    /// columns rely on this when partitions mutate slots concurrently.
    pub fn index(&self) -> usize {
        self.index as usize
    }

    /// Get the generation number
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}, gen: {})", self.index, self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_creation() {
        let entity = Entity::new(42, 1);
        assert_eq!(entity.index(), 42);
        assert_eq!(entity.generation(), 1);
    }

    #[test]
    fn test_entity_equality() {
        let e1 = Entity::new(1, 0);
        let e2 = Entity::new(1, 0);
        let e3 = Entity::new(1, 1);
        assert_eq!(e1, e2);
        assert_ne!(e1, e3);
    }

    #[test]
    fn test_entity_display() {
        let entity = Entity::new(7, 2);
        assert_eq!(entity.to_string(), "Entity(7, gen: 2)");
    }
}
