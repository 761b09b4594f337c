//! # Component Storage
//!
//! Dense, pre-allocated component arrays indexed by entity slot.
//!
//! Transform components are read and written every tick by the transform
//! system, so the storage is a flat boxed slice:
//! - All slots are allocated when the world is created
//! - Access is O(1) via entity index
//! - Whole-table passes walk contiguous memory

use super::component::Component;

/// Pre-allocated storage for a single component type.
///
/// # Example
///
/// ```rust,ignore
/// let mut storage: ComponentStorage<LocalTransformComponent> = ComponentStorage::new(1024);
/// storage.set(0, LocalTransformComponent::default());
/// ```
pub struct ComponentStorage<C: Component> {
    data: Box<[C]>,
}

impl<C: Component> ComponentStorage<C> {
    /// Creates storage with `capacity` default-initialized slots.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");
        Self {
            data: vec![C::default(); capacity].into_boxed_slice(),
        }
    }

    /// Returns the number of slots.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Gets a component by entity index.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&C> {
        self.data.get(index)
    }

    /// Gets a mutable component by entity index.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut C> {
        self.data.get_mut(index)
    }

    /// Overwrites the slot at `index`.
    ///
    /// Returns `false` if `index` is out of bounds.
    #[inline]
    pub fn set(&mut self, index: usize, component: C) -> bool {
        match self.data.get_mut(index) {
            Some(slot) => {
                *slot = component;
                true
            }
            None => false,
        }
    }

    /// Returns every slot, alive or not.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[C] {
        &self.data
    }

    /// Returns every slot mutably, alive or not.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [C] {
        &mut self.data
    }

    /// Resets a slot to the component's default value.
    #[inline]
    pub fn reset(&mut self, index: usize) {
        if let Some(slot) = self.data.get_mut(index) {
            *slot = C::default();
        }
    }
}
