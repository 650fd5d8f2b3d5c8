//! Entity Component System (ECS) update core
//!
//! This module provides the per-frame execution engine:
//! - Entity handles and lifecycle management
//! - Dense component columns safe to mutate from disjoint partitions
//! - The system update contract with pre/post hooks
//! - Partitioned dispatch across a reusable worker pool

mod component;
mod entity;
mod entity_set;
mod runner;
mod system;
mod systems;
mod world;

pub mod components;

pub use component::{Column, Component};
pub use entity::Entity;
pub use entity_set::EntitySet;
pub use runner::{partition, partition_range, Runner};
pub use system::{PartitionUpdate, SequentialSystem, System};
pub use systems::{ActionSystem, EntitySetSystem};
pub use world::World;
