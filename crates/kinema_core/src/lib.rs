//! # KINEMA Core
//!
//! The substrate the transform pipeline runs on:
//! - A minimal, fixed-capacity ECS (stable entity handles, dense component arrays)
//! - A paged bump-pointer pool for scene graph node records
//! - Transform math (`Transform`, absolute override flags)
//! - Fixed-step frame state for double-buffered world transforms
//!
//! ## Architecture Rules
//!
//! 1. **No per-node heap allocation** - Pool pages are reused across rebuilds
//! 2. **Data-oriented design** - Components are stored in contiguous arrays
//! 3. **Cache-friendly iteration** - Hot data is packed together
//!
//! ## Example
//!
//! ```rust,ignore
//! use kinema_core::{World, NodeComponent, Transform};
//!
//! let mut world = World::new(10_000);
//! let root = world.spawn();
//! world.set_node(root, NodeComponent::root());
//! world.set_local_transform(root, Transform::from_position(glam::Vec3::X));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod ecs;
pub mod math;
pub mod memory;
pub mod sync;

pub use ecs::{
    Component, ComponentStorage, Entity, EntityId, FinalTransformComponent, Interpolated,
    LocalTransformComponent, Movable, NodeComponent, StateSeeded, StaticSnapshot, Tag,
    World, WorldTransformComponent,
};
pub use math::{Transform, TransformFlags};
pub use memory::{NodePool, PoolHandle, PAGE_SIZE};
pub use sync::{FixedStepClock, FrameState};
