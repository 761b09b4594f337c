//! # Entity Component System
//!
//! The minimal ECS contract the transform pipeline needs.
//!
//! ## Design Philosophy
//!
//! - All storage is pre-allocated at world creation
//! - Components are stored in dense arrays for cache efficiency
//! - Entity IDs are simple indices with generation counters
//! - The scene graph treats entity IDs as opaque, hashable keys

mod component;
mod entity;
mod storage;
mod world;

pub use component::{
    Component, FinalTransformComponent, Interpolated, LocalTransformComponent, Movable,
    NodeComponent, StateSeeded, StaticSnapshot, Tag, WorldTransformComponent,
};
pub use entity::{Entity, EntityId};
pub use storage::ComponentStorage;
pub use world::World;
