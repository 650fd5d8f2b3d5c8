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
//! # Update Engine
//!
//! The per-frame update core of an ECS (Entity Component System) framework,
//! with deterministic partitioned dispatch across a reusable worker pool.
//!
//! ## Features
//!
//! - **Update contract**: enable-gated systems with pre/post hooks and a
//!   full happens-before guarantee around the dispatch barrier
//! - **Deterministic partitioning**: pure partition math shared by the
//!   runner and the entity-bound systems, gapless for any workload size
//! - **Pool reuse**: worker threads are created once per runner and reused
//!   by every dispatch (optional, via the `parallel` feature)
//! - **Single-threaded fallback**: systems built without a runner execute
//!   inline with observably identical results
//!
//! ## Example
//!
//! ```
//! use update_engine::ecs::{Entity, EntitySet, EntitySetSystem, System};
//!
//! let set = EntitySet::new(vec![Entity::new(0, 0), Entity::new(1, 0)]);
//! let mut system = EntitySetSystem::new(set, |dt: &f32, entities: &[Entity]| {
//!     for entity in entities {
//!         let _ = (dt, entity.index());
//!     }
//! });
//!
//! system.update(1.0 / 60.0);
//! ```

#![warn(missing_docs)]

/// Entity Component System update core
pub mod ecs;

pub use ecs::{Entity, World};
