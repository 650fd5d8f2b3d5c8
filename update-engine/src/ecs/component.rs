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
//! Component storage and management
//!
//! Components are data containers that can be attached to entities. Storage
//! is organized as one dense column per component type, indexed by entity
//! index, so a contiguous partition of entity indices maps directly onto
//! disjoint column slots. That layout is what lets update partitions mutate
//! component data from several worker threads at once.

use std::cell::UnsafeCell;

/// Trait that all components must implement
///
/// Components should be plain data structures without behavior. `Default`
/// supplies the value used to fill column slots no entity has written yet.
pub trait Component: 'static + Send + Sync + Default + Clone {}

/// Dense storage column for a single component type
///
/// A column owns one slot per entity index and grows on first write. Outside
/// a dispatch, the column is accessed exclusively through the safe
/// [`set`](Column::set)/[`get`](Column::get)/[`get_mut`](Column::get_mut)
/// methods. During a dispatch the column is shared by every worker, and the
/// [`slot`](Column::slot)/[`slot_mut`](Column::slot_mut) accessors hand out
/// references on `&self`; they are `unsafe` because the compiler cannot see
/// the invariant that makes them sound: each live entity has a unique index,
/// and partitions are disjoint index ranges.
///
/// # Example
///
/// ```
/// use update_engine::ecs::{Column, Component};
///
/// #[derive(Debug, Clone, Copy, Default, PartialEq)]
/// struct Health(u32);
/// impl Component for Health {}
///
/// let mut column = Column::new();
/// column.set(3, Health(100));
/// assert_eq!(column.get(3), Some(&Health(100)));
/// assert_eq!(column.get(0), Some(&Health(0)));
/// ```
pub struct Column<T: Component> {
    slots: Vec<UnsafeCell<T>>,
}

// SAFETY: shared access during a dispatch goes through `slot`/`slot_mut`,
// whose contract is that no two live references target the same slot.
// Workers honoring that contract touch disjoint slots only, so sharing the
// column across threads cannot race.
unsafe impl<T: Component> Sync for Column<T> {}

impl<T: Component> Column<T> {
    /// Create a new empty column
    pub fn new() -> Self {
        Column { slots: Vec::new() }
    }

    /// Create a column with `len` slots, each holding a copy of `value`
    ///
    /// Useful for initializing large uniform workloads in one call.
    pub fn filled(len: usize, value: T) -> Self {
        let mut slots = Vec::with_capacity(len);
        slots.resize_with(len, || UnsafeCell::new(value.clone()));
        Column { slots }
    }

    /// Get the number of slots in the column
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the column has no slots
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Write a component value at the given entity index
    ///
    /// Grows the column with default values if the index is past the end.
    pub fn set(&mut self, index: usize, value: T) {
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || UnsafeCell::new(T::default()));
        }
        *self.slots[index].get_mut() = value;
    }

    /// Get a reference to the component at the given entity index
    ///
    /// Returns None if the index is past the end of the column.
    pub fn get(&self, index: usize) -> Option<&T> {
        // SAFETY: a safe `&self` read can only coexist with other safe reads
        // or with `slot_mut` callers, and the latter promise exclusive access
        // to the slots they touch.
        self.slots.get(index).map(|cell| unsafe { &*cell.get() })
    }

    /// Get a mutable reference to the component at the given entity index
    ///
    /// Returns None if the index is past the end of the column.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index).map(UnsafeCell::get_mut)
    }

    /// Get a shared reference to a slot from a worker thread
    ///
    /// # Panics
    ///
    /// Panics if `index` is past the end of the column.
    ///
    /// # Safety
    ///
    /// No mutable reference to the same slot may be live for the duration of
    /// the returned borrow. Within a dispatch this holds when workers only
    /// read slots of entities inside their own partition, or slots no
    /// partition writes.
    pub unsafe fn slot(&self, index: usize) -> &T {
        &*self.slots[index].get()
    }

    /// Get a mutable reference to a slot from a worker thread
    ///
    /// # Panics
    ///
    /// Panics if `index` is past the end of the column.
    ///
    /// # Safety
    ///
    /// No other reference to the same slot may be live for the duration of
    /// the returned borrow. Within a dispatch this holds when workers only
    /// write slots of entities inside their own partition: live entities
    /// have unique indices and partitions are disjoint.
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn slot_mut(&self, index: usize) -> &mut T {
        &mut *self.slots[index].get()
    }
}

impl<T: Component> Default for Column<T> {
    fn default() -> Self {
        Self::new()
    }
}
