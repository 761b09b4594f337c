//! # Render Interpolation
//!
//! Turns the two world transform snapshots kept per entity into the
//! transform the renderer draws this frame.
//!
//! | Entity                      | Final transform                          |
//! |-----------------------------|------------------------------------------|
//! | `Movable` + `Interpolated`  | blend of `prev` and `state` snapshots    |
//! | `Movable`                   | `state` snapshot                         |
//! | static                      | copied once, then left alone             |

use kinema_core::{
    Component, Entity, FinalTransformComponent, FrameState, Interpolated, Movable,
    StaticSnapshot, Tag, World, WorldTransformComponent,
};

#[inline]
fn has_both_transforms(entity: &Entity) -> bool {
    entity.alive
        && entity.has_component(WorldTransformComponent::ID)
        && entity.has_component(FinalTransformComponent::ID)
}

/// Writes the final transform of every movable entity.
///
/// Entities tagged [`Interpolated`] blend from `prev_state_index` to
/// `state_index` by `frame.interpolate` (lerp on position and scale, slerp
/// on rotation). The rest snap to `state_index`. Returns the number of
/// entities written.
pub fn interpolate_transforms(world: &mut World, frame: &FrameState) -> usize {
    write_movable_finals(world, frame, true)
}

/// Copies the `state_index` snapshot to the final transform of every
/// movable entity, with no blending.
///
/// Used when interpolation is turned off. Returns the number of entities
/// written.
pub fn copy_transform_state(world: &mut World, frame: &FrameState) -> usize {
    write_movable_finals(world, frame, false)
}

fn write_movable_finals(world: &mut World, frame: &FrameState, blend: bool) -> usize {
    let mut written = 0;

    for entity in world.entities.iter() {
        if !has_both_transforms(entity) || !entity.has_component(Movable::ID) {
            continue;
        }
        let index = entity.id.index() as usize;
        let Some(slots) = world.world_transforms.get(index) else {
            continue;
        };

        let transform = if blend && entity.has_component(Interpolated::ID) {
            slots
                .get(frame.prev_state_index)
                .interpolate(slots.get(frame.state_index), frame.interpolate)
        } else {
            *slots.get(frame.state_index)
        };

        if world
            .final_transforms
            .set(index, FinalTransformComponent { transform })
        {
            written += 1;
        }
    }

    written
}

/// Gives every static entity its final transform, once.
///
/// A static entity (no [`Movable`] tag) with both a world and a final
/// transform gets its `state_index` snapshot copied and is tagged
/// [`StaticSnapshot`]. Tagged entities are skipped from then on, so later
/// changes to their world transform never reach the renderer. Returns the
/// number of entities snapshotted.
pub fn snapshot_static_transforms(world: &mut World, frame: &FrameState) -> usize {
    let mut taken = 0;

    for entity in world.entities.iter_mut() {
        if !has_both_transforms(entity)
            || entity.has_component(Movable::ID)
            || entity.has_component(StaticSnapshot::ID)
        {
            continue;
        }
        let index = entity.id.index() as usize;
        let Some(slots) = world.world_transforms.get(index) else {
            continue;
        };
        let transform = *slots.get(frame.state_index);

        if world
            .final_transforms
            .set(index, FinalTransformComponent { transform })
        {
            entity.add_component(StaticSnapshot::ID);
            taken += 1;
        }
    }

    taken
}
