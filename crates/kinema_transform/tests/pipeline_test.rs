//! # Pipeline Integration Test
//!
//! Drives `TransformSystem` with a `FixedStepClock` the way a game loop
//! does: several fixed steps, then one render present.

use glam::{Quat, Vec3};
use kinema_core::{
    EntityId, FixedStepClock, FrameState, Interpolated, Movable, NodeComponent, StaticSnapshot,
    Transform, World,
};
use kinema_transform::{FaultPolicy, TransformConfig, TransformError, TransformSystem};

const EPSILON: f32 = 1e-5;

fn spawn(world: &mut World, parent: EntityId, local: Transform) -> EntityId {
    let id = world.spawn();
    world.set_node(id, NodeComponent::child_of(parent));
    world.set_local_transform(id, local);
    world.add_world_transform(id);
    world.add_final_transform(id);
    id
}

fn spawn_mover(world: &mut World, parent: EntityId, local: Transform) -> EntityId {
    let id = spawn(world, parent, local);
    world.add_tag::<Movable>(id);
    world.add_tag::<Interpolated>(id);
    id
}

#[test]
fn test_interpolation_between_fixed_steps() {
    let mut world = World::new(64);
    let mover = spawn_mover(&mut world, EntityId::NULL, Transform::IDENTITY);

    let mut system = TransformSystem::default();
    let mut clock = FixedStepClock::new(0.25, 4);

    // Step 1 at x = 0, step 2 at x = 4
    clock.accumulate(0.25);
    assert!(clock.try_step());
    let _ = system.update(&mut world, &clock.frame()).unwrap();

    world.set_local_transform(mover, Transform::from_position(Vec3::new(4.0, 0.0, 0.0)));
    clock.accumulate(0.25);
    assert!(clock.try_step());
    let _ = system.update(&mut world, &clock.frame()).unwrap();

    // No time left over: exactly the previous step
    assert!(clock.frame().interpolate.abs() < f32::EPSILON);
    let _ = system.present(&mut world, &clock.frame());
    assert_eq!(world.final_transform(mover), Some(Transform::IDENTITY));

    // Half a step later: halfway
    clock.accumulate(0.125);
    assert!(!clock.try_step());
    let _ = system.present(&mut world, &clock.frame());
    let halfway = world.final_transform(mover).unwrap();
    assert!(halfway.position.abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), EPSILON));

    // A full blend lands exactly on the latest step
    let latest = clock.frame();
    let _ = system.present(&mut world, &FrameState::new(latest.state_index, 1.0));
    assert_eq!(
        world.final_transform(mover),
        Some(Transform::from_position(Vec3::new(4.0, 0.0, 0.0)))
    );
}

#[test]
fn test_first_step_does_not_blend_from_identity() {
    let mut world = World::new(8);
    let start = Transform::from_position(Vec3::new(0.0, 10.0, 0.0));
    let mover = spawn_mover(&mut world, EntityId::NULL, start);

    let mut system = TransformSystem::default();
    let _ = system.update(&mut world, &FrameState::new(1, 0.0)).unwrap();

    let _ = system.present(&mut world, &FrameState::new(1, 0.5));
    assert!(world.final_transform(mover).unwrap().abs_diff_eq(&start, EPSILON));
}

#[test]
fn test_static_snapshot_taken_once() {
    let mut world = World::new(16);
    let pillar = spawn(&mut world, EntityId::NULL, Transform::from_position(Vec3::Y));

    let mut system = TransformSystem::default();
    let frame = FrameState::default();
    let stats = system.update(&mut world, &frame).unwrap();
    assert_eq!(stats.snapshots, 1);
    assert!(world.has_tag::<StaticSnapshot>(pillar));
    assert_eq!(world.final_transform(pillar), Some(Transform::from_position(Vec3::Y)));

    // Mutating a static entity afterwards never reaches its final transform
    world.set_local_transform(pillar, Transform::from_position(Vec3::splat(100.0)));
    let stats = system.update(&mut world, &frame).unwrap();
    let _ = system.present(&mut world, &frame);
    assert_eq!(stats.snapshots, 0);
    assert_eq!(world.final_transform(pillar), Some(Transform::from_position(Vec3::Y)));
    // The world transform itself did move
    assert_eq!(
        world.world_transform(pillar, frame.state_index),
        Some(Transform::from_position(Vec3::splat(100.0)))
    );
}

#[test]
fn test_static_child_of_moving_parent_snapshots_world_space() {
    let mut world = World::new(16);
    let ship = spawn_mover(
        &mut world,
        EntityId::NULL,
        Transform::from_position_rotation(Vec3::new(5.0, 0.0, 0.0), Quat::from_rotation_z(0.0)),
    );
    let hull = spawn(&mut world, ship, Transform::from_position(Vec3::Y));

    let mut system = TransformSystem::default();
    let _ = system.update(&mut world, &FrameState::default()).unwrap();
    let hull_final = world.final_transform(hull).unwrap();
    assert!(hull_final.position.abs_diff_eq(Vec3::new(5.0, 1.0, 0.0), EPSILON));
}

#[test]
fn test_despawn_rebuilds_and_orphans_children() {
    let mut world = World::new(16);
    let root = spawn(&mut world, EntityId::NULL, Transform::from_position(Vec3::X));
    let child = spawn_mover(&mut world, root, Transform::from_position(Vec3::Y));

    let mut system = TransformSystem::default();
    let frame = FrameState::default();
    let _ = system.update(&mut world, &frame).unwrap();
    assert_eq!(system.rebuild_count(), 1);

    // The child now names a parent that is gone: it is left unindexed
    assert!(world.despawn(root));
    let stats = system.update(&mut world, &frame).unwrap();
    assert!(stats.rebuilt);
    assert_eq!(system.rebuild_count(), 2);
    assert_eq!(system.graph().report().unindexed, 2);
    assert_eq!(
        world.world_transform(child, frame.state_index),
        Some(Transform::IDENTITY)
    );

    // Re-rooting the child brings it back
    world.set_node(child, NodeComponent::root());
    let _ = system.update(&mut world, &frame).unwrap();
    assert!(system.graph().report().is_complete());
    assert_eq!(
        world.world_transform(child, frame.state_index),
        Some(Transform::from_position(Vec3::Y))
    );
}

#[test]
fn test_unreachable_error_policy_surfaces_once() {
    let mut world = World::new(16);
    let ghost = world.spawn();
    let orphan = spawn(&mut world, ghost, Transform::from_position(Vec3::Z));

    let config = TransformConfig::from_toml_str("unreachable_policy = \"error\"").unwrap();
    assert_eq!(config.unreachable_policy, FaultPolicy::Error);
    let mut system = TransformSystem::new(config);
    let frame = FrameState::default();

    let err = system.update(&mut world, &frame).unwrap_err();
    assert_eq!(err, TransformError::UnreachableNodes { count: 2 });

    // Same topology: the degraded build is used without another error
    let stats = system.update(&mut world, &frame).unwrap();
    assert!(!stats.rebuilt);
    assert_eq!(world.world_transform(orphan, 0), Some(Transform::IDENTITY));
}

#[test]
fn test_healthy_mover_keeps_moving_through_failed_rebuild() {
    let mut world = World::new(16);
    let mover = spawn_mover(&mut world, EntityId::NULL, Transform::from_position(Vec3::X));
    let mut system = TransformSystem::default();

    let _ = system.update(&mut world, &FrameState::new(1, 0.0)).unwrap();
    world.set_local_transform(mover, Transform::from_position(Vec3::new(2.0, 0.0, 0.0)));
    let _ = system.update(&mut world, &FrameState::new(0, 0.0)).unwrap();

    // A self-parented entity and a new static entity show up in the same step
    let bad = world.spawn();
    world.set_node(bad, NodeComponent::child_of(bad));
    let barrel = spawn(&mut world, EntityId::NULL, Transform::from_position(Vec3::Z));
    world.set_local_transform(mover, Transform::from_position(Vec3::new(3.0, 0.0, 0.0)));

    let frame = FrameState::new(1, 0.0);
    let err = system.update(&mut world, &frame).unwrap_err();
    assert_eq!(err, TransformError::SelfParent { entity: bad });

    assert_eq!(
        world.world_transform(mover, 1),
        Some(Transform::from_position(Vec3::new(3.0, 0.0, 0.0)))
    );
    let _ = system.present(&mut world, &frame);
    assert_eq!(
        world.final_transform(mover),
        Some(Transform::from_position(Vec3::new(2.0, 0.0, 0.0)))
    );
    let _ = system.present(&mut world, &FrameState::new(1, 1.0));
    assert_eq!(
        world.final_transform(mover),
        Some(Transform::from_position(Vec3::new(3.0, 0.0, 0.0)))
    );

    assert!(world.has_tag::<StaticSnapshot>(barrel));
    assert_eq!(world.final_transform(barrel), Some(Transform::from_position(Vec3::Z)));
}

#[test]
fn test_rejoining_graph_reseeds_both_slots() {
    let mut world = World::new(16);
    let mover = spawn_mover(&mut world, EntityId::NULL, Transform::from_position(Vec3::X));
    let mut system = TransformSystem::default();
    let _ = system.update(&mut world, &FrameState::new(0, 0.0)).unwrap();

    assert!(world.remove_node(mover));
    let _ = system.update(&mut world, &FrameState::new(1, 0.0)).unwrap();

    let rejoined = Transform::from_position(Vec3::new(5.0, 0.0, 0.0));
    world.set_local_transform(mover, rejoined);
    world.set_node(mover, NodeComponent::root());
    let _ = system.update(&mut world, &FrameState::new(0, 0.0)).unwrap();

    // Nothing blends from where the entity was before it left
    assert_eq!(world.world_transform(mover, 1), Some(rejoined));
    let _ = system.present(&mut world, &FrameState::new(0, 0.5));
    assert!(world.final_transform(mover).unwrap().abs_diff_eq(&rejoined, EPSILON));
}

#[test]
fn test_long_run_stays_stable() {
    let mut world = World::new(256);
    let mut clock = FixedStepClock::new(1.0 / 60.0, 4);
    let mut system = TransformSystem::default();

    let root = spawn_mover(&mut world, EntityId::NULL, Transform::IDENTITY);
    let mut parent = root;
    let mut chain = Vec::new();
    for _ in 0..100 {
        parent = spawn_mover(&mut world, parent, Transform::from_position(Vec3::X));
        chain.push(parent);
    }

    let spin = Quat::from_rotation_y(0.01);
    let mut angle = Quat::IDENTITY;
    for _ in 0..600 {
        clock.accumulate(1.0 / 60.0);
        while clock.try_step() {
            angle = (spin * angle).normalize();
            world.set_local_transform(root, Transform::from_position_rotation(Vec3::ZERO, angle));
            let _ = system.update(&mut world, &clock.frame()).unwrap();
        }
        let _ = system.present(&mut world, &clock.frame());
    }

    assert_eq!(system.rebuild_count(), 1);
    let tip = world.world_transform(chain[99], clock.frame().state_index).unwrap();
    // The chain is straight along the root's local X, so the tip stays at radius 100
    assert!((tip.position.length() - 100.0).abs() < 1e-2);
}
