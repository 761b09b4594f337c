//! # ECS World
//!
//! The central container for all entities and their transform components.
//! Pre-allocates all memory at creation time.

use super::component::{
    Component, FinalTransformComponent, LocalTransformComponent, NodeComponent, StateSeeded,
    Tag, WorldTransformComponent,
};
use super::entity::{Entity, EntityId};
use super::storage::ComponentStorage;
use crate::math::Transform;

/// The ECS World - container for everything the transform pipeline reads
/// and writes.
///
/// All memory is pre-allocated at creation. No allocations occur during
/// normal operations (spawn, despawn, component access).
///
/// # Topology Version
///
/// Every change that alters the scene graph's shape (spawning or despawning
/// an entity that carries a [`NodeComponent`], or setting/removing one) bumps
/// [`World::topology_version`]. The transform system rebuilds its graph when
/// the version it last saw differs.
///
/// # Example
///
/// ```rust,ignore
/// let mut world = World::new(1024);
///
/// let ship = world.spawn();
/// world.set_node(ship, NodeComponent::root());
/// world.set_local_transform(ship, Transform::from_position(Vec3::X));
/// world.add_world_transform(ship);
/// world.add_final_transform(ship);
/// world.add_tag::<Movable>(ship);
/// ```
pub struct World {
    /// All entity slots (pre-allocated).
    pub entities: Box<[Entity]>,
    /// Free list of entity indices for reuse.
    free_indices: Vec<u32>,
    /// Number of currently alive entities.
    alive_count: usize,
    /// Bumped on every scene graph shape change.
    topology_version: u64,

    // =========================================================================
    // Component Storages - Add new component types here
    // =========================================================================
    /// Scene graph membership.
    pub nodes: ComponentStorage<NodeComponent>,
    /// Local transforms (authored).
    pub local_transforms: ComponentStorage<LocalTransformComponent>,
    /// Double-buffered world transforms (computed).
    pub world_transforms: ComponentStorage<WorldTransformComponent>,
    /// Render transforms (interpolated).
    pub final_transforms: ComponentStorage<FinalTransformComponent>,
}

impl World {
    /// Creates a new world with the specified entity capacity.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero or exceeds `u32::MAX`.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");
        assert!(
            u32::try_from(capacity).is_ok(),
            "Capacity cannot exceed u32::MAX"
        );

        let entities = (0..capacity)
            .map(|_| Entity::dead())
            .collect::<Vec<_>>()
            .into_boxed_slice();

        let free_indices: Vec<u32> = (0..capacity as u32).rev().collect();

        Self {
            entities,
            free_indices,
            alive_count: 0,
            topology_version: 0,
            nodes: ComponentStorage::new(capacity),
            local_transforms: ComponentStorage::new(capacity),
            world_transforms: ComponentStorage::new(capacity),
            final_transforms: ComponentStorage::new(capacity),
        }
    }

    /// Returns the maximum capacity of this world.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entities.len()
    }

    /// Returns the number of currently alive entities.
    #[inline]
    #[must_use]
    pub const fn alive_count(&self) -> usize {
        self.alive_count
    }

    /// Returns the current topology version.
    #[inline]
    #[must_use]
    pub const fn topology_version(&self) -> u64 {
        self.topology_version
    }

    /// Spawns a new entity, returning its ID.
    ///
    /// Returns `EntityId::NULL` if capacity is reached.
    pub fn spawn(&mut self) -> EntityId {
        let Some(index) = self.free_indices.pop() else {
            return EntityId::NULL;
        };

        let entity = &mut self.entities[index as usize];

        // Increment generation to invalidate old references
        let generation = entity.id.generation().wrapping_add(1);
        let new_id = EntityId::new(index, generation);

        *entity = Entity::new(new_id);
        self.alive_count += 1;

        new_id
    }

    /// Despawns an entity, freeing its slot for reuse.
    ///
    /// Returns `false` if the entity was already dead or the ID was stale.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        if !self.is_alive(id) {
            return false;
        }

        let idx = id.index() as usize;
        let entity = &mut self.entities[idx];
        if entity.has_component(NodeComponent::ID) {
            self.topology_version += 1;
        }

        entity.alive = false;
        entity.component_mask = 0;
        self.alive_count -= 1;
        self.free_indices.push(id.index());

        self.nodes.reset(idx);
        self.local_transforms.reset(idx);
        self.world_transforms.reset(idx);
        self.final_transforms.reset(idx);

        true
    }

    /// Checks if an entity is alive.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        if id.is_null() {
            return false;
        }
        self.entities
            .get(id.index() as usize)
            .is_some_and(|e| e.alive && e.id.generation() == id.generation())
    }

    /// Gets an entity by ID, or `None` if dead/stale.
    #[inline]
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        if !self.is_alive(id) {
            return None;
        }
        Some(&self.entities[id.index() as usize])
    }

    /// Gets a mutable entity by ID, or `None` if dead/stale.
    #[inline]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        if !self.is_alive(id) {
            return None;
        }
        Some(&mut self.entities[id.index() as usize])
    }

    /// Iterates over all alive entities in slot order.
    pub fn iter_alive(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.alive)
    }

    /// Returns `true` if the entity is alive and has component `C`.
    #[inline]
    #[must_use]
    pub fn has<C: Component>(&self, id: EntityId) -> bool {
        self.get(id).is_some_and(|e| e.has_component(C::ID))
    }

    /// Returns `true` if the entity is alive and carries tag `T`.
    #[inline]
    #[must_use]
    pub fn has_tag<T: Tag>(&self, id: EntityId) -> bool {
        self.get(id).is_some_and(|e| e.has_component(T::ID))
    }

    /// Adds tag `T`. Returns `false` if the entity is dead.
    pub fn add_tag<T: Tag>(&mut self, id: EntityId) -> bool {
        self.mark(id, T::ID)
    }

    /// Removes tag `T`. Returns `false` if the entity is dead.
    pub fn remove_tag<T: Tag>(&mut self, id: EntityId) -> bool {
        match self.get_mut(id) {
            Some(entity) => {
                entity.remove_component(T::ID);
                true
            }
            None => false,
        }
    }

    /// Sets (or replaces) the entity's scene graph membership.
    ///
    /// Always bumps the topology version: a new parent is a new shape.
    pub fn set_node(&mut self, id: EntityId, node: NodeComponent) -> bool {
        if !self.mark(id, NodeComponent::ID) {
            return false;
        }
        let _ = self.nodes.set(id.index() as usize, node);
        self.topology_version += 1;
        true
    }

    /// Removes the entity from the scene graph.
    ///
    /// Also drops [`StateSeeded`], so rejoining the graph seeds both world
    /// transform slots again.
    pub fn remove_node(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.get_mut(id) else {
            return false;
        };
        if !entity.has_component(NodeComponent::ID) {
            return false;
        }
        entity.remove_component(NodeComponent::ID);
        entity.remove_component(StateSeeded::ID);
        self.nodes.reset(id.index() as usize);
        self.topology_version += 1;
        true
    }

    /// Sets the entity's local transform.
    pub fn set_local_transform(&mut self, id: EntityId, transform: Transform) -> bool {
        if !self.mark(id, LocalTransformComponent::ID) {
            return false;
        }
        self.local_transforms
            .set(id.index() as usize, LocalTransformComponent { transform })
    }

    /// Gives the entity a world transform component (identity in both slots).
    pub fn add_world_transform(&mut self, id: EntityId) -> bool {
        self.mark(id, WorldTransformComponent::ID)
    }

    /// Gives the entity a final transform component (identity).
    pub fn add_final_transform(&mut self, id: EntityId) -> bool {
        self.mark(id, FinalTransformComponent::ID)
    }

    /// Reads the entity's final (render) transform.
    #[must_use]
    pub fn final_transform(&self, id: EntityId) -> Option<Transform> {
        if !self.has::<FinalTransformComponent>(id) {
            return None;
        }
        self.final_transforms
            .get(id.index() as usize)
            .map(|c| c.transform)
    }

    /// Reads the world transform snapshot in `state_index`.
    #[must_use]
    pub fn world_transform(&self, id: EntityId, state_index: usize) -> Option<Transform> {
        if !self.has::<WorldTransformComponent>(id) {
            return None;
        }
        self.world_transforms
            .get(id.index() as usize)
            .map(|c| *c.get(state_index))
    }

    fn mark(&mut self, id: EntityId, component_id: u8) -> bool {
        match self.get_mut(id) {
            Some(entity) => {
                entity.add_component(component_id);
                true
            }
            None => false,
        }
    }
}
