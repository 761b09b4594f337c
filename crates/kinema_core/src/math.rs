//! # Transform Math
//!
//! Position/rotation/scale triples and the flags that control how they
//! inherit through the scene graph.

use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};
use glam::{Affine3A, Quat, Vec3};

bitflags! {
    /// Per-node absolute override flags.
    ///
    /// A set bit makes that channel ignore the parent's contribution: the
    /// local value is used directly as the world value.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TransformFlags: u32 {
        /// World position equals local position.
        const ABSOLUTE_POSITION = 1 << 0;
        /// World rotation equals local rotation.
        const ABSOLUTE_ROTATION = 1 << 1;
        /// World scale equals local scale.
        const ABSOLUTE_SCALE = 1 << 2;
    }
}

impl Default for TransformFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// A decomposed affine transform.
///
/// Field order keeps the quaternion on a 16-byte boundary so the struct is
/// `Pod` whether glam is built with SIMD or scalar math.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Transform {
    /// Rotation (unit quaternion).
    pub rotation: Quat,
    /// Translation.
    pub position: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
    /// Padding for alignment (keeps the size a multiple of 16).
    pub _padding: [f32; 2],
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self::new(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE);

    /// Creates a transform from its three channels.
    #[inline]
    #[must_use]
    pub const fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            rotation,
            position,
            scale,
            _padding: [0.0; 2],
        }
    }

    /// Creates a translation-only transform.
    #[inline]
    #[must_use]
    pub const fn from_position(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY, Vec3::ONE)
    }

    /// Creates a translation + rotation transform.
    #[inline]
    #[must_use]
    pub const fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self::new(position, rotation, Vec3::ONE)
    }

    /// Composes the equivalent affine matrix (scale, then rotate, then translate).
    #[inline]
    #[must_use]
    pub fn to_affine(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Blends towards `next`: lerp on position and scale, slerp on rotation.
    ///
    /// The endpoints are exact: `t <= 0` returns `self` and `t >= 1` returns
    /// `next` bit-for-bit.
    #[must_use]
    pub fn interpolate(&self, next: &Self, t: f32) -> Self {
        if t <= 0.0 {
            return *self;
        }
        if t >= 1.0 {
            return *next;
        }
        Self::new(
            self.position.lerp(next.position, t),
            self.rotation.slerp(next.rotation, t),
            self.scale.lerp(next.scale, t),
        )
    }

    /// Approximate equality on every channel.
    #[must_use]
    pub fn abs_diff_eq(&self, other: &Self, max_abs_diff: f32) -> bool {
        self.position.abs_diff_eq(other.position, max_abs_diff)
            && self.scale.abs_diff_eq(other.scale, max_abs_diff)
            && (self.rotation.abs_diff_eq(other.rotation, max_abs_diff)
                || self.rotation.abs_diff_eq(-other.rotation, max_abs_diff))
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_size() {
        assert_eq!(std::mem::size_of::<Transform>(), 48);
    }

    #[test]
    fn test_interpolate_endpoints_exact() {
        let a = Transform::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_rotation_y(0.3),
            Vec3::splat(2.0),
        );
        let b = Transform::new(
            Vec3::new(-4.0, 0.5, 9.0),
            Quat::from_rotation_x(-1.2),
            Vec3::new(1.0, 3.0, 0.5),
        );

        assert_eq!(a.interpolate(&b, 0.0), a);
        assert_eq!(a.interpolate(&b, 1.0), b);
        assert_eq!(a.interpolate(&b, -0.5), a);
        assert_eq!(a.interpolate(&b, 1.5), b);
    }

    #[test]
    fn test_interpolate_midpoint() {
        let a = Transform::from_position(Vec3::ZERO);
        let b = Transform::new(
            Vec3::new(2.0, 0.0, 0.0),
            Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
            Vec3::splat(3.0),
        );

        let mid = a.interpolate(&b, 0.5);
        assert!(mid.position.abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-6));
        assert!(mid.scale.abs_diff_eq(Vec3::splat(2.0), 1e-6));
        let expected = Quat::from_rotation_z(std::f32::consts::FRAC_PI_4);
        assert!(mid.rotation.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_to_affine_matches_channels() {
        let t = Transform::new(
            Vec3::new(5.0, 0.0, 0.0),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            Vec3::splat(2.0),
        );
        let p = t.to_affine().transform_point3(Vec3::X);
        // scale 2, rotate +90 about Y (X -> -Z), translate +5 X
        assert!(p.abs_diff_eq(Vec3::new(5.0, 0.0, -2.0), 1e-5));
    }

    #[test]
    fn test_flags_bits() {
        let flags = TransformFlags::ABSOLUTE_POSITION | TransformFlags::ABSOLUTE_SCALE;
        assert_eq!(flags.bits(), 0b101);
        assert_eq!(TransformFlags::from_bits_truncate(0xFF), TransformFlags::all());
    }
}
