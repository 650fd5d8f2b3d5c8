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
//! Basic example demonstrating a partitioned update cycle
//!
//! This example shows how to create a world, spawn entities with movement
//! components, and run an entity-set system through a worker pool.

use std::sync::Arc;

use update_engine::ecs::components::{Position, Speed};
use update_engine::ecs::{Column, Entity, EntitySetSystem, Runner, System};
use update_engine::World;

fn main() {
    println!("Update Engine - Basic Example");
    println!("=============================\n");

    // Create a world and spawn some entities
    let mut world = World::new();
    for _ in 0..8 {
        world.create_entity();
    }
    println!("Spawned {} entities", world.entity_count());

    // Attach movement components, one column per type
    let mut positions = Column::new();
    let mut speeds = Column::new();
    for entity in world.entities() {
        let i = entity.index();
        positions.set(i, Position::new(i as f32, 0.0));
        speeds.set(i, Speed::new(1.0, 0.5));
    }

    // Build the runner: a worker pool when available, inline otherwise
    #[cfg(feature = "parallel")]
    let runner = Arc::new(Runner::pooled_default());
    #[cfg(not(feature = "parallel"))]
    let runner = Arc::new(Runner::inline());
    println!("Dispatching across {} partition(s)\n", runner.worker_count());

    // The movement system advances each entity by its own speed
    let mut movement = EntitySetSystem::with_runner(
        world.entity_set(),
        runner,
        |dt: &f32, entities: &[Entity]| {
            for entity in entities {
                // SAFETY: entities are unique within the set and partitions
                // are disjoint, so no other reference to these slots is live.
                unsafe {
                    let speed = speeds.slot(entity.index());
                    let position = positions.slot_mut(entity.index());
                    position.x += speed.x * dt;
                    position.y += speed.y * dt;
                }
            }
        },
    );

    // Run a few cycles at 60 updates per second
    for _ in 0..60 {
        movement.update(1.0 / 60.0);
    }
    drop(movement);

    println!("Positions after one simulated second:");
    for entity in world.entity_set().view() {
        let position = positions.get(entity.index()).unwrap();
        println!("  {entity} -> ({:.2}, {:.2})", position.x, position.y);
    }
}
