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
//! Concrete system variants
//!
//! Two implementations of the update contract: [`EntitySetSystem`], which
//! slices its entity set across the runner's partitions and hands each
//! worker a contiguous slice, and [`ActionSystem`], the minimal baseline
//! that wraps a single callback with no partitioning machinery.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::ecs::runner::partition_range;
use crate::ecs::system::{fallback_runner, PartitionUpdate, System};
use crate::ecs::{Entity, EntitySet, Runner};

/// Hook run on the calling thread immediately before or after a dispatch
type Hook<T> = Box<dyn FnMut(&T)>;

/// System that updates the entities of a set, partition by partition
///
/// Each update cycle slices the set's view with the same partition math the
/// runner uses for ranges, and invokes the callback once per non-empty
/// slice: `update(state, entities)`. The callback may read and mutate each
/// entity's own component data but must not assume anything about entities
/// outside its slice, nor about the execution order of other partitions.
///
/// # Examples
///
/// ```
/// use update_engine::ecs::{Entity, EntitySet, EntitySetSystem, System};
///
/// let set = EntitySet::new(vec![Entity::new(0, 0), Entity::new(1, 0)]);
/// let mut system = EntitySetSystem::new(set, |dt: &f32, entities: &[Entity]| {
///     for entity in entities {
///         // read or write this entity's components
///         let _ = (dt, entity.index());
///     }
/// });
/// system.update(1.0 / 60.0);
/// ```
pub struct EntitySetSystem<T, F>
where
    F: Fn(&T, &[Entity]) + Sync,
{
    set: EntitySet,
    runner: Arc<Runner>,
    update: F,
    pre_update: Option<Hook<T>>,
    post_update: Option<Hook<T>>,
    enabled: bool,
    _state: PhantomData<fn(&T)>,
}

impl<T, F> EntitySetSystem<T, F>
where
    F: Fn(&T, &[Entity]) + Sync,
{
    /// Create a system over `set` using the single-threaded inline runner
    pub fn new(set: EntitySet, update: F) -> Self {
        Self::with_runner(set, fallback_runner(), update)
    }

    /// Create a system over `set` that dispatches through `runner`
    ///
    /// The runner is shared, not owned: dropping the system releases only
    /// its handle.
    pub fn with_runner(set: EntitySet, runner: Arc<Runner>, update: F) -> Self {
        EntitySetSystem {
            set,
            runner,
            update,
            pre_update: None,
            post_update: None,
            enabled: true,
            _state: PhantomData,
        }
    }

    /// Install a hook that runs single-threaded before each dispatch
    pub fn with_pre_update(mut self, hook: impl FnMut(&T) + 'static) -> Self {
        self.pre_update = Some(Box::new(hook));
        self
    }

    /// Install a hook that runs single-threaded after the dispatch barrier
    pub fn with_post_update(mut self, hook: impl FnMut(&T) + 'static) -> Self {
        self.post_update = Some(Box::new(hook));
        self
    }

    /// Get the entity set this system updates
    pub fn entity_set(&self) -> &EntitySet {
        &self.set
    }

    /// Replace the entity set between cycles
    ///
    /// This is the membership-refresh path: the set must not change while a
    /// dispatch is in flight, which exclusive access here guarantees.
    pub fn set_entity_set(&mut self, set: EntitySet) {
        self.set = set;
    }
}

impl<T, F> System<T> for EntitySetSystem<T, F>
where
    T: Sync,
    F: Fn(&T, &[Entity]) + Sync,
{
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

        if let Some(hook) = self.pre_update.as_mut() {
            hook(&state);
        }

        self.runner.run(&SetCycle {
            state: &state,
            entities: self.set.view(),
            update: &self.update,
        });

        if let Some(hook) = self.post_update.as_mut() {
            hook(&state);
        }
    }
}

/// One cycle's borrows, shared read-only across the workers of a dispatch
struct SetCycle<'a, T, F> {
    state: &'a T,
    entities: &'a [Entity],
    update: &'a F,
}

impl<T, F> PartitionUpdate for SetCycle<'_, T, F>
where
    T: Sync,
    F: Fn(&T, &[Entity]) + Sync,
{
    fn update_partition(&self, index: usize, partitions: usize) {
        let range = partition_range(self.entities.len(), partitions, index);
        if !range.is_empty() {
            (self.update)(self.state, &self.entities[range]);
        }
    }
}

/// Minimal baseline system wrapping a single callback
///
/// Always runs as one conceptual partition covering the whole state,
/// invoked directly on the calling thread without any partitioning
/// machinery. Useful for per-cycle work that has no entity workload, and as
/// the reference against which partitioned systems are cross-checked.
///
/// # Examples
///
/// ```
/// use update_engine::ecs::{ActionSystem, System};
///
/// let mut elapsed = 0.0;
/// let mut system = ActionSystem::new(|dt: &f32| elapsed += dt);
/// system.update(0.5);
/// drop(system);
/// assert_eq!(elapsed, 0.5);
/// ```
pub struct ActionSystem<T, A>
where
    A: FnMut(&T),
{
    action: A,
    enabled: bool,
    _state: PhantomData<fn(&T)>,
}

impl<T, A> ActionSystem<T, A>
where
    A: FnMut(&T),
{
    /// Create a system that invokes `action` once per enabled update
    pub fn new(action: A) -> Self {
        ActionSystem {
            action,
            enabled: true,
            _state: PhantomData,
        }
    }
}

impl<T, A> System<T> for ActionSystem<T, A>
where
    A: FnMut(&T),
{
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn update(&mut self, state: T) {
        if self.enabled {
            (self.action)(&state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn set_of(count: u32) -> EntitySet {
        EntitySet::new((0..count).map(|i| Entity::new(i, 0)).collect())
    }

    #[test]
    fn test_action_system_calls_the_action() {
        let mut done = false;
        let mut system = ActionSystem::new(|_: &i32| done = true);
        system.update(0);
        drop(system);
        assert!(done);
    }

    #[test]
    fn test_action_system_not_called_when_disabled() {
        let mut done = false;
        let mut system = ActionSystem::new(|_: &i32| done = true);
        system.set_enabled(false);
        system.update(0);
        drop(system);
        assert!(!done);
    }

    #[test]
    fn test_action_system_called_once_per_update() {
        let calls = AtomicUsize::new(0);
        let mut system = ActionSystem::new(|_: &i32| {
            calls.fetch_add(1, Ordering::Relaxed);
        });
        system.update(0);
        system.update(0);
        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_entity_set_system_visits_every_entity() {
        let visited = Mutex::new(vec![0usize; 10]);
        let mut system = EntitySetSystem::new(set_of(10), |_: &f32, entities: &[Entity]| {
            let mut visited = visited.lock().unwrap();
            for entity in entities {
                visited[entity.index()] += 1;
            }
        });

        system.update(1.0);
        drop(system);
        assert!(visited.into_inner().unwrap().iter().all(|&n| n == 1));
    }

    #[test]
    fn test_entity_set_system_disabled_is_a_no_op() {
        let calls = AtomicUsize::new(0);
        let hooks = Arc::new(AtomicUsize::new(0));
        let pre_hooks = Arc::clone(&hooks);
        let post_hooks = Arc::clone(&hooks);
        let mut system = EntitySetSystem::new(set_of(4), |_: &f32, _: &[Entity]| {
            calls.fetch_add(1, Ordering::Relaxed);
        })
        .with_pre_update(move |_| {
            pre_hooks.fetch_add(1, Ordering::Relaxed);
        })
        .with_post_update(move |_| {
            post_hooks.fetch_add(1, Ordering::Relaxed);
        });

        system.set_enabled(false);
        system.update(1.0);
        drop(system);

        assert_eq!(calls.load(Ordering::Relaxed), 0);
        assert_eq!(hooks.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_hooks_bracket_the_dispatch() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let update_log = Arc::clone(&log);
        let pre_log = Arc::clone(&log);
        let post_log = Arc::clone(&log);
        let mut system = EntitySetSystem::new(set_of(3), move |_: &f32, _: &[Entity]| {
            update_log.lock().unwrap().push("update");
        })
        .with_pre_update(move |_| pre_log.lock().unwrap().push("pre"))
        .with_post_update(move |_| post_log.lock().unwrap().push("post"));

        system.update(1.0);

        assert_eq!(*log.lock().unwrap(), vec!["pre", "update", "post"]);
    }

    #[test]
    fn test_empty_set_never_invokes_the_callback() {
        let calls = AtomicUsize::new(0);
        let mut system = EntitySetSystem::new(set_of(0), |_: &f32, _: &[Entity]| {
            calls.fetch_add(1, Ordering::Relaxed);
        });
        system.update(1.0);
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_set_entity_set_swaps_the_workload() {
        let count = AtomicUsize::new(0);
        let mut system = EntitySetSystem::new(set_of(2), |_: &f32, entities: &[Entity]| {
            count.fetch_add(entities.len(), Ordering::Relaxed);
        });

        system.update(1.0);
        system.set_entity_set(set_of(5));
        system.update(1.0);
        drop(system);

        assert_eq!(count.load(Ordering::Relaxed), 2 + 5);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_entity_set_system_with_pooled_runner() {
        let runner = Arc::new(Runner::pooled(4));
        let visited: Vec<AtomicUsize> = (0..100).map(|_| AtomicUsize::new(0)).collect();

        let mut system =
            EntitySetSystem::with_runner(set_of(100), runner, |_: &f32, entities: &[Entity]| {
                for entity in entities {
                    visited[entity.index()].fetch_add(1, Ordering::Relaxed);
                }
            });
        system.update(1.0);
        drop(system);

        for count in &visited {
            assert_eq!(count.load(Ordering::Relaxed), 1);
        }
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_post_update_runs_after_the_barrier() {
        let processed = Arc::new(AtomicUsize::new(0));
        let seen_at_post = Arc::new(AtomicUsize::new(0));

        let runner = Arc::new(Runner::pooled(4));
        let counter = Arc::clone(&processed);
        let observed = Arc::clone(&seen_at_post);
        let post_counter = Arc::clone(&processed);

        let mut system =
            EntitySetSystem::with_runner(set_of(64), runner, move |_: &f32, entities: &[Entity]| {
                counter.fetch_add(entities.len(), Ordering::SeqCst);
            })
            .with_post_update(move |_| {
                observed.store(post_counter.load(Ordering::SeqCst), Ordering::SeqCst);
            });

        system.update(1.0);
        // Every partition completed before the post hook observed the count
        assert_eq!(seen_at_post.load(Ordering::SeqCst), 64);
    }
}
