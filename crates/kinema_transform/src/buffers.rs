//! # Flat Transform Buffers
//!
//! Structure-of-arrays storage addressed by dense node index:
//!
//! ```text
//! index:      0        1      2      3   ...
//! local:    [ I    |  L1  |  L2  |  L3  | ...]
//! world:    [ I    |  W1  |  W2  |  W3  | ...]
//! matrices: [ I    |  M1  |  M2  |  M3  | ...]
//! flags:    [ 0    |  F1  |  F2  |  F3  | ...]
//! hierarchy:[ 0    |  0   |  1   |  1   | ...]
//!             ^ sentinel, never written
//! ```
//!
//! The arrays are resized on rebuild only and reuse their capacity.

use glam::Affine3A;
use kinema_core::{Transform, TransformFlags};

/// Per-index transform arrays for one graph build.
#[derive(Debug, Default)]
pub struct TransformBuffers {
    pub(crate) local: Vec<Transform>,
    pub(crate) world: Vec<Transform>,
    pub(crate) matrices: Vec<Affine3A>,
    pub(crate) flags: Vec<TransformFlags>,
    pub(crate) hierarchy: Vec<u32>,
}

impl TransformBuffers {
    /// Creates empty buffers.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            local: Vec::new(),
            world: Vec::new(),
            matrices: Vec::new(),
            flags: Vec::new(),
            hierarchy: Vec::new(),
        }
    }

    /// Number of slots, sentinel included. Zero before the first build.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.hierarchy.len()
    }

    /// Returns `true` before the first build.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hierarchy.is_empty()
    }

    /// Sizes every array to match `hierarchy` and resets all slots to
    /// identity with no override flags.
    pub(crate) fn reset_to_hierarchy(&mut self) {
        let len = self.hierarchy.len();

        self.local.clear();
        self.local.resize(len, Transform::IDENTITY);
        self.world.clear();
        self.world.resize(len, Transform::IDENTITY);
        self.matrices.clear();
        self.matrices.resize(len, Affine3A::IDENTITY);
        self.flags.clear();
        self.flags.resize(len, TransformFlags::empty());
    }

    /// Drops every slot, keeping capacity.
    pub(crate) fn clear(&mut self) {
        self.local.clear();
        self.world.clear();
        self.matrices.clear();
        self.flags.clear();
        self.hierarchy.clear();
    }

    /// Local transforms by index.
    #[inline]
    #[must_use]
    pub fn local(&self) -> &[Transform] {
        &self.local
    }

    /// World transforms by index.
    #[inline]
    #[must_use]
    pub fn world(&self) -> &[Transform] {
        &self.world
    }

    /// World matrices by index.
    #[inline]
    #[must_use]
    pub fn matrices(&self) -> &[Affine3A] {
        &self.matrices
    }

    /// Absolute override flags by index.
    #[inline]
    #[must_use]
    pub fn flags(&self) -> &[TransformFlags] {
        &self.flags
    }

    /// Parent index by index. `hierarchy[i] < i` for every `i >= 1`.
    #[inline]
    #[must_use]
    pub fn hierarchy(&self) -> &[u32] {
        &self.hierarchy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_reset_sizes_all_arrays() {
        let mut buffers = TransformBuffers::new();
        assert!(buffers.is_empty());

        buffers.hierarchy.extend_from_slice(&[0, 0, 1, 1]);
        buffers.reset_to_hierarchy();

        assert_eq!(buffers.len(), 4);
        assert_eq!(buffers.local().len(), 4);
        assert_eq!(buffers.world().len(), 4);
        assert_eq!(buffers.matrices().len(), 4);
        assert_eq!(buffers.flags().len(), 4);
        assert_eq!(buffers.world()[0], Transform::IDENTITY);
        assert_eq!(buffers.matrices()[0], Affine3A::IDENTITY);
    }

    #[test]
    fn test_reset_overwrites_stale_values() {
        let mut buffers = TransformBuffers::new();
        buffers.hierarchy.extend_from_slice(&[0, 0]);
        buffers.reset_to_hierarchy();
        buffers.local[1] = Transform::from_position(Vec3::X);
        buffers.flags[1] = TransformFlags::ABSOLUTE_SCALE;

        buffers.reset_to_hierarchy();
        assert_eq!(buffers.local()[1], Transform::IDENTITY);
        assert!(buffers.flags()[1].is_empty());

        buffers.clear();
        assert!(buffers.is_empty());
        assert!(buffers.world().is_empty());
    }
}
