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
//! System execution contracts
//!
//! Systems contain the logic that runs once per update cycle over a state
//! value of type `T`. This module defines the update contract every system
//! implements, the partition-processing capability the runner fans out, and
//! a sequential aggregate for driving several systems as one.

use crate::ecs::Runner;

/// Update contract implemented by every system
///
/// A system runs one discrete unit of per-cycle logic. The state value is
/// passed in by the caller each cycle and is only valid for the duration of
/// that call.
pub trait System<T> {
    /// Whether this system should process updates
    fn is_enabled(&self) -> bool;

    /// Enable or disable this system
    ///
    /// The flag is read once at the entry of each update cycle; flipping it
    /// mid-dispatch does not affect the cycle already in flight.
    fn set_enabled(&mut self, enabled: bool);

    /// Run one update cycle with the given state
    ///
    /// When the system is disabled this is a complete no-op: no hooks are
    /// invoked, nothing is dispatched, and the state is dropped.
    fn update(&mut self, state: T);
}

/// One partition's worth of update work
///
/// The runner depends only on this capability: it invokes
/// `update_partition(index, n)` exactly once for every `index` in `0..n`
/// and knows nothing about the concrete system behind it. Implementations
/// translate the partition index into a slice of their own workload, using
/// the same partition math the runner uses for ranges.
pub trait PartitionUpdate: Sync {
    /// Process partition `index` out of `partitions` total
    ///
    /// `partitions` is the exclusive upper bound on `index`. May be called
    /// from any worker thread, concurrently with other partitions of the
    /// same dispatch.
    fn update_partition(&self, index: usize, partitions: usize);
}

/// Aggregate that updates a list of systems in registration order
///
/// The children run sequentially on the calling thread; each child is free
/// to fan its own work out through a runner. Disabling the aggregate skips
/// every child.
///
/// # Examples
///
/// ```
/// use update_engine::ecs::{ActionSystem, SequentialSystem, System};
///
/// let mut frame = SequentialSystem::new(vec![
///     Box::new(ActionSystem::new(|dt: &f32| println!("physics {dt}"))) as Box<dyn System<f32>>,
///     Box::new(ActionSystem::new(|dt: &f32| println!("ai {dt}"))),
/// ]);
/// frame.update(1.0 / 60.0);
/// ```
pub struct SequentialSystem<T> {
    systems: Vec<Box<dyn System<T>>>,
    enabled: bool,
}

impl<T> SequentialSystem<T> {
    /// Create an aggregate from an ordered list of systems
    pub fn new(systems: Vec<Box<dyn System<T>>>) -> Self {
        SequentialSystem {
            systems,
            enabled: true,
        }
    }

    /// Append a system to the end of the update order
    pub fn add<S: System<T> + 'static>(&mut self, system: S) {
        self.systems.push(Box::new(system));
    }

    /// Get the number of aggregated systems
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Check if the aggregate contains no systems
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

impl<T> Default for SequentialSystem<T> {
    fn default() -> Self {
        SequentialSystem::new(Vec::new())
    }
}

impl<T: Clone> System<T> for SequentialSystem<T> {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn update(&mut self, state: T) {
        if !self.enabled {
            return;
        }
        for system in &mut self.systems {
            system.update(state.clone());
        }
    }
}

/// Helper for systems constructed without a runner: the single-threaded
/// inline fallback, shared behind an `Arc` like any other runner.
pub(crate) fn fallback_runner() -> std::sync::Arc<Runner> {
    std::sync::Arc::new(Runner::inline())
}
