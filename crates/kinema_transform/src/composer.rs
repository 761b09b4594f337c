//! # World Transform Composer
//!
//! One forward pass over the flat buffers. Because every parent index is
//! smaller than its child's, the parent's world transform is always final
//! by the time the child reads it. No recursion, no stack.

use kinema_core::{Transform, TransformFlags};

use crate::buffers::TransformBuffers;

/// Composes world transforms for every indexed node.
///
/// Roots (`[1, num_root_nodes)`) copy their local transform. Every other
/// node combines its local transform with its parent's world transform per
/// channel, unless that channel's absolute flag is set:
///
/// - position: parent matrix applied to the local position
/// - rotation: `parent.rotation * local.rotation`
/// - scale: `parent.scale * local.scale`, component-wise
///
/// Scale composition ignores rotation, so a rotated, non-uniformly scaled
/// parent does not shear its children. Index 0 is never written.
pub fn calc_world_transform(buffers: &mut TransformBuffers, num_root_nodes: usize) {
    let TransformBuffers {
        local,
        world,
        matrices,
        flags,
        hierarchy,
    } = buffers;

    let len = hierarchy.len();
    let roots_end = num_root_nodes.clamp(1, len.max(1));

    for i in 1..roots_end {
        world[i] = local[i];
        matrices[i] = local[i].to_affine();
    }

    for i in roots_end..len {
        let parent = hierarchy[i] as usize;
        debug_assert!(parent < i, "Parent index {parent} not before child {i}");

        let node_local = local[i];
        let node_flags = flags[i];
        let parent_world = world[parent];

        let position = if node_flags.contains(TransformFlags::ABSOLUTE_POSITION) {
            node_local.position
        } else {
            matrices[parent].transform_point3(node_local.position)
        };
        let rotation = if node_flags.contains(TransformFlags::ABSOLUTE_ROTATION) {
            node_local.rotation
        } else {
            parent_world.rotation * node_local.rotation
        };
        let scale = if node_flags.contains(TransformFlags::ABSOLUTE_SCALE) {
            node_local.scale
        } else {
            parent_world.scale * node_local.scale
        };

        let composed = Transform::new(position, rotation, scale);
        world[i] = composed;
        matrices[i] = composed.to_affine();
    }

    tracing::trace!("Composed {} world transforms", len.saturating_sub(1));
}
