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
//! Edge case tests for partitioned dispatch
//!
//! Tests boundary workload sizes, invalid construction arguments, worker
//! failure, and runner sharing.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use update_engine::ecs::{partition, Entity, EntitySet, EntitySetSystem, Runner, System};

fn entity_range(count: u32) -> EntitySet {
    EntitySet::new((0..count).map(|i| Entity::new(i, 0)).collect())
}

#[test]
#[should_panic(expected = "partitions must be positive")]
fn partition_rejects_zero_partitions() {
    partition(100, 0);
}

#[cfg(feature = "parallel")]
#[test]
#[should_panic(expected = "worker_count must be positive")]
fn pooled_runner_rejects_zero_workers() {
    Runner::pooled(0);
}

#[cfg(feature = "parallel")]
#[test]
fn empty_set_completes_without_invoking_the_callback() {
    let calls = AtomicUsize::new(0);
    let mut system = EntitySetSystem::with_runner(
        entity_range(0),
        Arc::new(Runner::pooled(4)),
        |_: &f32, _: &[Entity]| {
            calls.fetch_add(1, Ordering::Relaxed);
        },
    );

    system.update(1.0);
    drop(system);
    assert_eq!(calls.load(Ordering::Relaxed), 0);
}

#[cfg(feature = "parallel")]
#[test]
fn three_entities_across_eight_partitions_process_exactly_once() {
    let visited: Vec<AtomicUsize> = (0..3).map(|_| AtomicUsize::new(0)).collect();
    let mut system = EntitySetSystem::with_runner(
        entity_range(3),
        Arc::new(Runner::pooled(8)),
        |_: &f32, entities: &[Entity]| {
            for entity in entities {
                visited[entity.index()].fetch_add(1, Ordering::Relaxed);
            }
        },
    );

    system.update(1.0);
    drop(system);

    for count in &visited {
        assert_eq!(count.load(Ordering::Relaxed), 1);
    }
}

#[cfg(feature = "parallel")]
#[test]
fn disabled_system_skips_dispatch_entirely() {
    let calls = AtomicUsize::new(0);
    let mut system = EntitySetSystem::with_runner(
        entity_range(1000),
        Arc::new(Runner::pooled(4)),
        |_: &f32, _: &[Entity]| {
            calls.fetch_add(1, Ordering::Relaxed);
        },
    );

    system.set_enabled(false);
    system.update(1.0);
    drop(system);
    assert_eq!(calls.load(Ordering::Relaxed), 0);
}

#[cfg(feature = "parallel")]
#[test]
fn panicking_partition_surfaces_after_the_others_complete() {
    let runner = Runner::pooled(4);
    let completed = AtomicUsize::new(0);

    let result = catch_unwind(AssertUnwindSafe(|| {
        runner.dispatch(4, |range| {
            if range.start == 1 {
                panic!("partition failure");
            }
            completed.fetch_add(1, Ordering::SeqCst);
        });
    }));

    assert!(result.is_err());
    // The barrier held: every non-panicking partition still ran
    assert_eq!(completed.load(Ordering::SeqCst), 3);

    // The pool survives the panic and stays usable
    let after = AtomicUsize::new(0);
    runner.dispatch(4, |range| {
        after.fetch_add(range.len(), Ordering::SeqCst);
    });
    assert_eq!(after.load(Ordering::SeqCst), 4);
}

#[cfg(feature = "parallel")]
#[test]
fn one_runner_serves_many_systems() {
    let runner = Arc::new(Runner::pooled(4));
    let first = AtomicUsize::new(0);
    let second = AtomicUsize::new(0);

    let mut movement = EntitySetSystem::with_runner(
        entity_range(100),
        Arc::clone(&runner),
        |_: &f32, entities: &[Entity]| {
            first.fetch_add(entities.len(), Ordering::Relaxed);
        },
    );
    let mut cleanup = EntitySetSystem::with_runner(
        entity_range(7),
        Arc::clone(&runner),
        |_: &f32, entities: &[Entity]| {
            second.fetch_add(entities.len(), Ordering::Relaxed);
        },
    );

    movement.update(1.0);
    cleanup.update(1.0);
    drop(movement);
    drop(cleanup);

    assert_eq!(first.load(Ordering::Relaxed), 100);
    assert_eq!(second.load(Ordering::Relaxed), 7);

    // Dropping the systems released only their handles
    assert_eq!(Arc::strong_count(&runner), 1);
}

#[test]
fn inline_dispatch_handles_every_workload_size() {
    let runner = Runner::inline();
    for total in [0usize, 1, 2, 3, 1000] {
        let visited = AtomicUsize::new(0);
        runner.dispatch(total, |range| {
            visited.fetch_add(range.len(), Ordering::Relaxed);
        });
        assert_eq!(visited.load(Ordering::Relaxed), total);
    }
}
