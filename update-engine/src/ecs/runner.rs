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
//! Partitioned dispatch across a reusable worker pool
//!
//! This module provides the runner that fans one update cycle out across a
//! fixed set of worker threads and rejoins at a barrier, together with the
//! pure partition math both the runner and the entity-bound systems use so
//! they always compute identical boundaries. With the `parallel` feature
//! enabled, pooled runners are backed by a Rayon thread pool created once
//! and reused for every dispatch; the inline runner executes on the calling
//! thread and is the default when no pool is configured.

use std::ops::Range;

use crate::ecs::system::PartitionUpdate;

/// Compute the boundaries of one partition
///
/// Shares its math with [`partition`]: the first `partitions - 1` ranges
/// have `count / partitions` elements and the last absorbs the remainder,
/// so the ranges are contiguous, ascending, and cover `0..count` exactly.
/// When `count < partitions` the leading ranges are empty and the last one
/// holds every element.
///
/// # Panics
///
/// Panics if `partitions` is zero or `index` is not below `partitions`.
pub fn partition_range(count: usize, partitions: usize, index: usize) -> Range<usize> {
    assert!(partitions > 0, "partitions must be positive");
    assert!(
        index < partitions,
        "partition index {index} out of range for {partitions} partitions"
    );

    let chunk = count / partitions;
    let start = chunk * index;
    let end = if index + 1 == partitions {
        count
    } else {
        start + chunk
    };
    start..end
}

/// Split `0..count` into `partitions` contiguous ranges
///
/// Always returns exactly `partitions` ranges; some may be empty when
/// `count < partitions`, and all are empty when `count` is zero. See
/// [`partition_range`] for the sizing rule.
///
/// # Panics
///
/// Panics if `partitions` is zero.
///
/// # Examples
///
/// ```
/// use update_engine::ecs::partition;
///
/// assert_eq!(partition(10, 4), vec![0..2, 2..4, 4..6, 6..10]);
/// assert_eq!(partition(7, 1), vec![0..7]);
/// ```
pub fn partition(count: usize, partitions: usize) -> Vec<Range<usize>> {
    assert!(partitions > 0, "partitions must be positive");
    (0..partitions)
        .map(|index| partition_range(count, partitions, index))
        .collect()
}

/// Execution backend selected at construction
enum Backend {
    /// Run every partition on the calling thread
    Inline,
    /// Fan partitions out across a persistent worker pool
    #[cfg(feature = "parallel")]
    Pooled {
        pool: rayon::ThreadPool,
        workers: usize,
    },
}

/// Dispatcher that fans update work out across worker threads
///
/// A runner owns its worker pool for its entire lifetime: threads are
/// created once at construction and reused by every dispatch, and the pool
/// is torn down when the runner is dropped. Many systems may share one
/// runner through an `Arc`; dropping a system only releases its handle.
///
/// Every dispatch blocks the calling thread until all partitions have
/// completed. There is no ordering guarantee between partitions of the same
/// dispatch, and no cancellation: a partition that stalls blocks the caller
/// indefinitely. Overlapping dispatches from different threads against one
/// runner are memory-safe (the pool is internally synchronized) but carry
/// no ordering guarantee relative to each other.
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use update_engine::ecs::Runner;
///
/// let runner = Runner::inline();
/// let total = AtomicUsize::new(0);
/// runner.dispatch(10, |range| {
///     total.fetch_add(range.len(), Ordering::Relaxed);
/// });
/// assert_eq!(total.into_inner(), 10);
/// ```
pub struct Runner {
    backend: Backend,
}

impl Runner {
    /// Create the degenerate single-threaded runner
    ///
    /// Executes every callback directly on the calling thread over the
    /// whole range. For callbacks that treat partitions independently, the
    /// result is observably identical to any pooled runner.
    pub fn inline() -> Self {
        Runner {
            backend: Backend::Inline,
        }
    }

    /// Create a runner backed by a pool of `worker_count` threads
    ///
    /// The threads are spawned immediately and live until the runner is
    /// dropped; dispatches never create threads.
    ///
    /// # Panics
    ///
    /// Panics if `worker_count` is zero, or if the operating system refuses
    /// to spawn the pool.
    #[cfg(feature = "parallel")]
    pub fn pooled(worker_count: usize) -> Self {
        assert!(worker_count > 0, "worker_count must be positive");

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(worker_count)
            .thread_name(|i| format!("update-worker-{i}"))
            .build()
            .expect("failed to spawn the worker pool");

        Runner {
            backend: Backend::Pooled {
                pool,
                workers: worker_count,
            },
        }
    }

    /// Create a pooled runner sized to the available hardware parallelism
    ///
    /// Falls back to one worker when the parallelism cannot be queried.
    #[cfg(feature = "parallel")]
    pub fn pooled_default() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::pooled(workers)
    }

    /// Get the number of partitions a dispatch is split into
    ///
    /// Returns 1 for the inline runner.
    pub fn worker_count(&self) -> usize {
        match &self.backend {
            Backend::Inline => 1,
            #[cfg(feature = "parallel")]
            Backend::Pooled { workers, .. } => *workers,
        }
    }

    /// Fan a task out across the pool and block until every partition is done
    ///
    /// Invokes `task.update_partition(index, n)` exactly once for every
    /// `index` in `0..n`, where `n` is [`worker_count`](Runner::worker_count).
    /// The calling thread parks at the barrier; it does not spin.
    ///
    /// If a partition panics, the remaining partitions still run to
    /// completion and the first panic resumes on the calling thread once the
    /// barrier is satisfied. Nothing is swallowed.
    pub fn run<P>(&self, task: &P)
    where
        P: PartitionUpdate + ?Sized,
    {
        match &self.backend {
            Backend::Inline => task.update_partition(0, 1),
            #[cfg(feature = "parallel")]
            Backend::Pooled { pool, workers } => {
                let workers = *workers;
                pool.scope(|scope| {
                    for index in 0..workers {
                        scope.spawn(move |_| task.update_partition(index, workers));
                    }
                });
            }
        }
    }

    /// Partition `0..total` and invoke `process` once per non-empty range
    ///
    /// The ranges come from [`partition`] with this runner's worker count,
    /// so they are disjoint, gapless, and deterministic for a given
    /// `(total, worker_count)` pair. Empty ranges are skipped, which means
    /// `process` is never invoked when `total` is zero. Blocking and panic
    /// behavior are those of [`run`](Runner::run).
    pub fn dispatch<F>(&self, total: usize, process: F)
    where
        F: Fn(Range<usize>) + Sync,
    {
        self.run(&RangeTask { total, process });
    }
}

impl Default for Runner {
    fn default() -> Self {
        Runner::inline()
    }
}

/// Adapter turning a range callback into a partition task
struct RangeTask<F> {
    total: usize,
    process: F,
}

impl<F> PartitionUpdate for RangeTask<F>
where
    F: Fn(Range<usize>) + Sync,
{
    fn update_partition(&self, index: usize, partitions: usize) {
        let range = partition_range(self.total, partitions, index);
        if !range.is_empty() {
            (self.process)(range);
        }
    }
}
