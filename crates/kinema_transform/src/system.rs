//! # Transform System
//!
//! Drives the scene graph from ECS data once per fixed step:
//!
//! 1. Rebuild the graph if the world's topology version moved
//! 2. Copy local transforms and override flags into the flat buffers
//! 3. Compose world transforms
//! 4. Read them back into `WorldTransformComponent[state_index]`
//! 5. Snapshot static entities that have not been snapshotted yet
//!
//! [`TransformSystem::present`] runs once per rendered frame and fills in
//! final transforms for movable entities.

use kinema_core::{
    Component, EntityId, FrameState, LocalTransformComponent, NodeComponent, StateSeeded,
    Transform, World, WorldTransformComponent,
};

use crate::config::TransformConfig;
use crate::error::{TransformError, TransformResult};
use crate::graph::SceneGraph;
use crate::index::IndexReport;
use crate::interpolation;
use crate::node::NodeId;

/// What one [`TransformSystem::update`] call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateStats {
    /// The graph was rebuilt this update.
    pub rebuilt: bool,
    /// Nodes whose world transform was composed (sentinel excluded).
    pub composed: usize,
    /// Entities whose world transform component was written.
    pub read_back: usize,
    /// Static entities snapshotted this update.
    pub snapshots: usize,
}

/// Owns the scene graph and keeps it in step with a [`World`].
pub struct TransformSystem {
    config: TransformConfig,
    graph: SceneGraph,
    /// Graph-member entities with their node, in world slot order.
    bindings: Vec<(EntityId, NodeId)>,
    seen_topology: Option<u64>,
    rebuild_count: u64,
}

impl TransformSystem {
    /// Creates a system with an empty graph.
    #[must_use]
    pub fn new(config: TransformConfig) -> Self {
        Self {
            graph: SceneGraph::new(&config),
            config,
            bindings: Vec::new(),
            seen_topology: None,
            rebuild_count: 0,
        }
    }

    /// The active configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// The scene graph as of the last update.
    #[inline]
    #[must_use]
    pub const fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Number of graph rebuilds so far.
    #[inline]
    #[must_use]
    pub const fn rebuild_count(&self) -> u64 {
        self.rebuild_count
    }

    /// Runs one fixed step of transform propagation.
    ///
    /// # Errors
    ///
    /// Returns the rebuild error (attach failure, or a fault the config
    /// turns into an error) on the update that rebuilt the graph. The step
    /// still runs to completion on the degraded build: healthy entities are
    /// composed, read back and snapshotted as usual, and failed nodes read
    /// identity. The degraded build stays in effect until the topology
    /// changes again.
    pub fn update(&mut self, world: &mut World, frame: &FrameState) -> TransformResult<UpdateStats> {
        let mut stats = UpdateStats::default();
        let mut rebuild_error = None;

        if self.seen_topology != Some(world.topology_version()) {
            self.seen_topology = Some(world.topology_version());
            stats.rebuilt = true;
            if let Err(error) = self.rebuild(world) {
                rebuild_error = Some(error);
            }
        }

        self.write_locals(world);
        self.graph.calc_world_transform();
        stats.composed = self.graph.len().saturating_sub(1);

        stats.read_back = self.read_back(world, frame);
        stats.snapshots = interpolation::snapshot_static_transforms(world, frame);

        match rebuild_error {
            Some(error) => Err(error),
            None => Ok(stats),
        }
    }

    /// Writes final transforms for this rendered frame.
    ///
    /// Blends between the last two steps when interpolation is enabled,
    /// otherwise snaps to the latest. Returns the number of entities written.
    pub fn present(&self, world: &mut World, frame: &FrameState) -> usize {
        if self.config.interpolation {
            interpolation::interpolate_transforms(world, frame)
        } else {
            interpolation::copy_transform_state(world, frame)
        }
    }

    fn rebuild(&mut self, world: &World) -> TransformResult<IndexReport> {
        self.graph.clear();
        self.bindings.clear();

        let mut first_error: Option<TransformError> = None;
        for entity in world.iter_alive() {
            if !entity.has_component(NodeComponent::ID) {
                continue;
            }
            let Some(node) = world.nodes.get(entity.id.index() as usize) else {
                continue;
            };
            match self.graph.attach(entity.id, node.parent) {
                Ok(id) => self.bindings.push((entity.id, id)),
                Err(error) => {
                    tracing::error!("Dropping entity {:?} from scene graph: {}", entity.id, error);
                    if first_error.is_none() {
                        first_error = Some(error);
                    }
                }
            }
        }

        let result = self.graph.finalize();
        self.rebuild_count += 1;
        tracing::debug!(
            "Scene graph rebuilt (#{}) for topology version {}: {} bound entities",
            self.rebuild_count,
            world.topology_version(),
            self.bindings.len()
        );

        match first_error {
            Some(error) => Err(error),
            None => result,
        }
    }

    fn write_locals(&mut self, world: &World) {
        for &(entity, node) in &self.bindings {
            let index = entity.index() as usize;
            let local = if world.has::<LocalTransformComponent>(entity) {
                world
                    .local_transforms
                    .get(index)
                    .map_or(Transform::IDENTITY, |c| c.transform)
            } else {
                Transform::IDENTITY
            };
            let flags = world
                .nodes
                .get(index)
                .map(NodeComponent::flags)
                .unwrap_or_default();

            self.graph.set_local_transform(node, &local, flags);
        }
    }

    fn read_back(&self, world: &mut World, frame: &FrameState) -> usize {
        let mut written = 0;

        for &(entity, node) in &self.bindings {
            if !world.has::<WorldTransformComponent>(entity) {
                continue;
            }
            let transform = self.graph.world_transform(node);
            let seeded = world.has_tag::<StateSeeded>(entity);

            let Some(slots) = world.world_transforms.get_mut(entity.index() as usize) else {
                continue;
            };
            if seeded {
                slots.slots[frame.state_index & 1] = transform;
            } else {
                // First write fills both slots so nothing blends from identity
                slots.slots = [transform; 2];
                world.add_tag::<StateSeeded>(entity);
            }
            written += 1;
        }

        written
    }
}

impl Default for TransformSystem {
    fn default() -> Self {
        Self::new(TransformConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use kinema_core::{Movable, TransformFlags};

    const EPSILON: f32 = 1e-5;

    fn spawn_node(world: &mut World, parent: EntityId, position: Vec3) -> EntityId {
        let id = world.spawn();
        world.set_node(id, NodeComponent::child_of(parent));
        world.set_local_transform(id, Transform::from_position(position));
        world.add_world_transform(id);
        world.add_final_transform(id);
        id
    }

    #[test]
    fn test_update_propagates_and_reads_back() {
        let mut world = World::new(16);
        let root = spawn_node(&mut world, EntityId::NULL, Vec3::X);
        let child = spawn_node(&mut world, root, Vec3::Y);

        let mut system = TransformSystem::default();
        let frame = FrameState::new(0, 1.0);
        let stats = system.update(&mut world, &frame).unwrap();

        assert!(stats.rebuilt);
        assert_eq!(stats.composed, 2);
        assert_eq!(stats.read_back, 2);
        assert_eq!(system.rebuild_count(), 1);

        let slot = world.world_transform(child, 0).unwrap();
        assert!(slot.position.abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), EPSILON));
        // Seeded: both slots hold the first result
        assert_eq!(world.world_transform(child, 1), Some(slot));
        assert!(world.has_tag::<StateSeeded>(child));
    }

    #[test]
    fn test_no_rebuild_without_topology_change() {
        let mut world = World::new(16);
        let root = spawn_node(&mut world, EntityId::NULL, Vec3::ZERO);

        let mut system = TransformSystem::default();
        let frame = FrameState::default();
        let _ = system.update(&mut world, &frame).unwrap();

        world.set_local_transform(root, Transform::from_position(Vec3::Z));
        let stats = system.update(&mut world, &frame).unwrap();
        assert!(!stats.rebuilt);
        assert_eq!(system.rebuild_count(), 1);
        assert_eq!(
            world.world_transform(root, frame.state_index),
            Some(Transform::from_position(Vec3::Z))
        );
    }

    #[test]
    fn test_reparent_triggers_rebuild() {
        let mut world = World::new(16);
        let a = spawn_node(&mut world, EntityId::NULL, Vec3::X);
        let b = spawn_node(&mut world, EntityId::NULL, Vec3::Y);
        let c = spawn_node(&mut world, a, Vec3::Z);

        let mut system = TransformSystem::default();
        let frame = FrameState::default();
        let _ = system.update(&mut world, &frame).unwrap();
        assert!(world
            .world_transform(c, 0)
            .unwrap()
            .position
            .abs_diff_eq(Vec3::new(1.0, 0.0, 1.0), EPSILON));

        world.set_node(c, NodeComponent::child_of(b));
        let stats = system.update(&mut world, &frame).unwrap();
        assert!(stats.rebuilt);
        assert_eq!(system.rebuild_count(), 2);
        assert!(world
            .world_transform(c, 0)
            .unwrap()
            .position
            .abs_diff_eq(Vec3::new(0.0, 1.0, 1.0), EPSILON));
    }

    #[test]
    fn test_node_flags_reach_composer() {
        let mut world = World::new(16);
        let root = spawn_node(&mut world, EntityId::NULL, Vec3::splat(5.0));
        let pinned = spawn_node(&mut world, root, Vec3::X);
        world.set_node(
            pinned,
            NodeComponent::new(root, TransformFlags::ABSOLUTE_POSITION),
        );

        let mut system = TransformSystem::default();
        let _ = system.update(&mut world, &FrameState::default()).unwrap();
        assert!(world
            .world_transform(pinned, 0)
            .unwrap()
            .position
            .abs_diff_eq(Vec3::X, EPSILON));
    }

    #[test]
    fn test_self_parent_reported_and_dropped() {
        let mut world = World::new(16);
        let root = spawn_node(&mut world, EntityId::NULL, Vec3::X);
        let bad = world.spawn();
        world.set_node(bad, NodeComponent::child_of(bad));

        let mut system = TransformSystem::default();
        let frame = FrameState::default();
        let err = system.update(&mut world, &frame).unwrap_err();
        assert_eq!(err, TransformError::SelfParent { entity: bad });
        // The failing step still composed the healthy part of the graph
        assert_eq!(
            world.world_transform(root, 0),
            Some(Transform::from_position(Vec3::X))
        );

        let stats = system.update(&mut world, &frame).unwrap();
        assert!(!stats.rebuilt);
        assert_eq!(stats.read_back, 1);
        assert!(system.graph().find(bad).is_none());
    }

    #[test]
    fn test_present_respects_interpolation_setting() {
        let mut world = World::new(16);
        let mover = spawn_node(&mut world, EntityId::NULL, Vec3::ZERO);
        world.add_tag::<Movable>(mover);
        world.add_tag::<kinema_core::Interpolated>(mover);

        let config = TransformConfig {
            interpolation: false,
            ..TransformConfig::default()
        };
        let mut system = TransformSystem::new(config);
        let _ = system.update(&mut world, &FrameState::new(0, 0.0)).unwrap();
        world.set_local_transform(mover, Transform::from_position(Vec3::X));
        let _ = system.update(&mut world, &FrameState::new(1, 0.0)).unwrap();

        // Copy path ignores the blend factor
        assert_eq!(system.present(&mut world, &FrameState::new(1, 0.0)), 1);
        assert_eq!(
            world.final_transform(mover),
            Some(Transform::from_position(Vec3::X))
        );
    }
}
