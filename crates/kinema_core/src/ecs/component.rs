//! # Component System
//!
//! Components are pure data containers with no behavior.
//! They must be Copy and have a fixed size for zero-allocation storage.
//!
//! Tags are components without data: they only occupy a bit in the
//! entity's component mask.

use bytemuck::{Pod, Zeroable};

use super::entity::EntityId;
use crate::math::{Transform, TransformFlags};

/// Marker trait for ECS components.
///
/// Components must be:
/// - `Copy`: No heap allocations, bitwise copyable
/// - `Pod`: Plain old data, safe to transmute
/// - `Zeroable`: Can be safely zeroed
/// - `Default`: Must have a default value for pre-allocation
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone, Copy, Default, Pod, Zeroable)]
/// #[repr(C)]
/// struct Health {
///     value: f32,
/// }
///
/// impl Component for Health {
///     const ID: u8 = 10;
/// }
/// ```
pub trait Component: Copy + Pod + Zeroable + Default + Send + Sync + 'static {
    /// Unique identifier for this component type (0-63).
    ///
    /// This ID is used for the component bitmask in entities.
    const ID: u8;
}

/// Marker trait for data-less tags.
///
/// Tag IDs share the entity bitmask with component IDs and must not collide.
pub trait Tag: 'static {
    /// Unique identifier for this tag (0-63).
    const ID: u8;
}

/// Scene graph membership.
///
/// Presence of this component puts the entity into the scene graph.
/// `parent == EntityId::NULL` makes it a root.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct NodeComponent {
    /// Parent entity, or `EntityId::NULL` for a root.
    pub parent: EntityId,
    /// Raw `TransformFlags` bits.
    pub flags: u32,
    /// Padding for alignment.
    pub _padding: u32,
}

impl Component for NodeComponent {
    const ID: u8 = 0;
}

impl NodeComponent {
    /// Creates a node attached under `parent`.
    #[inline]
    #[must_use]
    pub const fn new(parent: EntityId, flags: TransformFlags) -> Self {
        Self {
            parent,
            flags: flags.bits(),
            _padding: 0,
        }
    }

    /// Creates a root node with no overrides.
    #[inline]
    #[must_use]
    pub const fn root() -> Self {
        Self::new(EntityId::NULL, TransformFlags::empty())
    }

    /// Creates a child of `parent` with no overrides.
    #[inline]
    #[must_use]
    pub const fn child_of(parent: EntityId) -> Self {
        Self::new(parent, TransformFlags::empty())
    }

    /// Returns the absolute override flags.
    #[inline]
    #[must_use]
    pub const fn flags(&self) -> TransformFlags {
        TransformFlags::from_bits_truncate(self.flags)
    }
}

impl Default for NodeComponent {
    fn default() -> Self {
        Self::root()
    }
}

/// Transform relative to the parent (or world space for roots).
///
/// Authored by gameplay code every tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct LocalTransformComponent {
    /// The local transform.
    pub transform: Transform,
}

impl Component for LocalTransformComponent {
    const ID: u8 = 1;
}

/// World transform snapshots for the last two fixed steps.
///
/// Slot `state_index` holds the latest step, slot `prev_state_index` the one
/// before it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct WorldTransformComponent {
    /// Double-buffered world transforms, indexed by frame state index.
    pub slots: [Transform; 2],
}

impl Component for WorldTransformComponent {
    const ID: u8 = 2;
}

impl WorldTransformComponent {
    /// Returns the snapshot for `state_index`.
    #[inline]
    #[must_use]
    pub const fn get(&self, state_index: usize) -> &Transform {
        &self.slots[state_index & 1]
    }
}

/// Render transform produced by the interpolation layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct FinalTransformComponent {
    /// The transform renderers should use this frame.
    pub transform: Transform,
}

impl Component for FinalTransformComponent {
    const ID: u8 = 3;
}

/// The entity's world transform may change after spawn.
pub struct Movable;

impl Tag for Movable {
    const ID: u8 = 16;
}

/// Movable entity whose final transform is blended between fixed steps.
pub struct Interpolated;

impl Tag for Interpolated {
    const ID: u8 = 17;
}

/// Static entity whose final transform has already been copied.
pub struct StaticSnapshot;

impl Tag for StaticSnapshot {
    const ID: u8 = 18;
}

/// Both world transform slots have been written at least once.
pub struct StateSeeded;

impl Tag for StateSeeded {
    const ID: u8 = 19;
}
