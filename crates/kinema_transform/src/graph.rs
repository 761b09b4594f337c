//! # Scene Graph
//!
//! Builds a parent/child hierarchy from entity handles, indexes it
//! topologically, and composes world transforms over flat buffers.
//!
//! ## Lifecycle
//!
//! ```text
//! clear ─► attach* ─► finalize ─► (set_local_transform* ─► calc_world_transform ─► read*)*
//!   ▲                                                                              │
//!   └──────────────────────────── topology change ─────────────────────────────────┘
//! ```
//!
//! Every call order violation is caught by `debug_assert!` in debug builds.

use glam::Affine3A;
use kinema_core::{EntityId, Transform, TransformFlags};

use crate::buffers::TransformBuffers;
use crate::composer;
use crate::config::{FaultPolicy, TransformConfig};
use crate::error::{TransformError, TransformResult};
use crate::hash::NodeHash;
use crate::index::{self, IndexReport};
use crate::node::NodeId;

/// Where the graph is in its build/compose cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Accepting `attach` calls.
    Building,
    /// Indexed; local transforms may be written.
    Finalized,
    /// World transforms are current.
    Composed,
}

/// A scene graph for one topology.
///
/// # Example
///
/// ```rust,ignore
/// let mut graph = SceneGraph::new(&TransformConfig::default());
///
/// let ship = graph.attach(ship_entity, EntityId::NULL)?;
/// let turret = graph.attach(turret_entity, ship_entity)?;
/// graph.finalize()?;
///
/// graph.set_local_transform(ship, &ship_local, TransformFlags::empty());
/// graph.set_local_transform(turret, &turret_local, TransformFlags::empty());
/// graph.calc_world_transform();
///
/// let turret_world = graph.world_transform(turret);
/// ```
pub struct SceneGraph {
    nodes: NodeHash,
    roots: Option<NodeId>,
    order: Vec<NodeId>,
    buffers: TransformBuffers,
    num_root_nodes: usize,
    report: IndexReport,
    phase: Phase,
    cycle_policy: FaultPolicy,
    unreachable_policy: FaultPolicy,
}

impl SceneGraph {
    /// Creates an empty graph using the fault policies from `config`.
    #[must_use]
    pub fn new(config: &TransformConfig) -> Self {
        Self {
            nodes: NodeHash::new(),
            roots: None,
            order: Vec::new(),
            buffers: TransformBuffers::new(),
            num_root_nodes: 0,
            report: IndexReport::default(),
            phase: Phase::Building,
            cycle_policy: config.cycle_policy,
            unreachable_policy: config.unreachable_policy,
        }
    }

    /// Discards every node and returns to the building phase.
    ///
    /// Pool pages, the bucket table and buffer capacity are kept, so a
    /// rebuild of a same-sized graph allocates nothing.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots = None;
        self.order.clear();
        self.buffers.clear();
        self.num_root_nodes = 0;
        self.report = IndexReport::default();
        self.phase = Phase::Building;
    }

    /// Adds `entity` under `parent`, or as a root if `parent` is null.
    ///
    /// The parent does not need to be attached first. Children are prepended,
    /// so siblings are indexed in reverse attach order.
    ///
    /// # Errors
    ///
    /// - `NullEntity` if `entity` is null
    /// - `SelfParent` if `entity == parent`
    /// - `AlreadyAttached` if `entity` was attached earlier in this build
    pub fn attach(&mut self, entity: EntityId, parent: EntityId) -> TransformResult<NodeId> {
        debug_assert!(
            self.phase == Phase::Building,
            "attach after finalize; clear the graph first"
        );

        if entity.is_null() {
            return Err(TransformError::NullEntity);
        }
        if entity == parent {
            return Err(TransformError::SelfParent { entity });
        }

        let id = self.nodes.insert(entity);
        if self.nodes[id].attached {
            return Err(TransformError::AlreadyAttached { entity });
        }
        self.nodes[id].attached = true;

        if parent.is_null() {
            self.nodes[id].next_sibling = self.roots;
            self.roots = Some(id);
        } else {
            let parent_id = self.nodes.insert(parent);
            self.nodes[id].next_sibling = self.nodes[parent_id].children;
            self.nodes[parent_id].children = Some(id);
        }

        Ok(id)
    }

    /// Indexes the graph and sizes the transform buffers.
    ///
    /// The buffers are usable even when this returns an error: nodes that
    /// could not be indexed alias the identity sentinel.
    ///
    /// # Errors
    ///
    /// - `CycleDetected` if a cycle was found and the cycle policy is `Error`
    /// - `UnreachableNodes` if some nodes have no path from a root and the
    ///   unreachable policy is `Error`
    pub fn finalize(&mut self) -> TransformResult<IndexReport> {
        let report = index::build_index(
            &mut self.nodes,
            self.roots,
            &mut self.buffers.hierarchy,
            &mut self.order,
        );
        self.buffers.reset_to_hierarchy();
        self.num_root_nodes = report.num_root_nodes;
        self.report = report;
        self.phase = Phase::Finalized;

        tracing::debug!(
            "Scene graph indexed: {} nodes, {} roots, {} unindexed",
            report.indexed,
            report.num_root_nodes - 1,
            report.unindexed
        );

        if report.cycle_detected {
            enforce(
                self.cycle_policy,
                TransformError::CycleDetected {
                    unindexed: report.unindexed,
                },
            )?;
        } else if report.unindexed > 0 {
            enforce(
                self.unreachable_policy,
                TransformError::UnreachableNodes {
                    count: report.unindexed,
                },
            )?;
        }

        Ok(report)
    }

    /// Writes a node's local transform and override flags.
    ///
    /// Does nothing for a node that was left unindexed.
    pub fn set_local_transform(&mut self, node: NodeId, local: &Transform, flags: TransformFlags) {
        debug_assert!(
            self.phase != Phase::Building,
            "set_local_transform before finalize"
        );

        let index = self.node_index(node) as usize;
        if index == 0 {
            return;
        }
        self.buffers.local[index] = *local;
        self.buffers.flags[index] = flags;
        self.phase = Phase::Finalized;
    }

    /// Composes world transforms for every indexed node.
    pub fn calc_world_transform(&mut self) {
        debug_assert!(
            self.phase != Phase::Building,
            "calc_world_transform before finalize"
        );

        composer::calc_world_transform(&mut self.buffers, self.num_root_nodes);
        self.phase = Phase::Composed;
    }

    /// Reads a node's world transform. Unindexed nodes read identity.
    #[must_use]
    pub fn world_transform(&self, node: NodeId) -> Transform {
        debug_assert!(
            self.phase == Phase::Composed,
            "world_transform read before calc_world_transform"
        );

        self.buffers
            .world
            .get(self.node_index(node) as usize)
            .copied()
            .unwrap_or(Transform::IDENTITY)
    }

    /// Reads a node's world matrix. Unindexed nodes read identity.
    #[must_use]
    pub fn world_matrix(&self, node: NodeId) -> Affine3A {
        debug_assert!(
            self.phase == Phase::Composed,
            "world_matrix read before calc_world_transform"
        );

        self.buffers
            .matrices
            .get(self.node_index(node) as usize)
            .copied()
            .unwrap_or(Affine3A::IDENTITY)
    }

    /// Returns the node's dense index, or 0 if it was not indexed.
    #[inline]
    #[must_use]
    pub fn node_index(&self, node: NodeId) -> u32 {
        self.nodes.get(node).map_or(0, |n| n.index)
    }

    /// Looks up the node for `entity`.
    #[inline]
    #[must_use]
    pub fn find(&self, entity: EntityId) -> Option<NodeId> {
        self.nodes.find(entity)
    }

    /// Returns the node at dense index `index`.
    #[inline]
    #[must_use]
    pub fn node_at(&self, index: u32) -> Option<NodeId> {
        let slot = (index as usize).checked_sub(1)?;
        self.order.get(slot).copied()
    }

    /// Returns the entity a node stands for.
    #[inline]
    #[must_use]
    pub fn entity(&self, node: NodeId) -> Option<EntityId> {
        self.nodes.get(node).map(|n| n.key)
    }

    /// Parent index table.
    #[inline]
    #[must_use]
    pub fn hierarchy(&self) -> &[u32] {
        self.buffers.hierarchy()
    }

    /// End of the root range. Roots occupy `[1, num_root_nodes)`.
    #[inline]
    #[must_use]
    pub const fn num_root_nodes(&self) -> usize {
        self.num_root_nodes
    }

    /// Buffer length, sentinel included.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// Returns `true` if no node has been attached.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes, including parents that were never attached.
    #[inline]
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The flat buffers.
    #[inline]
    #[must_use]
    pub const fn buffers(&self) -> &TransformBuffers {
        &self.buffers
    }

    /// Report from the last `finalize`.
    #[inline]
    #[must_use]
    pub const fn report(&self) -> &IndexReport {
        &self.report
    }

    /// Current phase.
    #[inline]
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Node pool pages held, reused across rebuilds.
    #[inline]
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.nodes.page_count()
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new(&TransformConfig::default())
    }
}

fn enforce(policy: FaultPolicy, error: TransformError) -> TransformResult<()> {
    match policy {
        FaultPolicy::Ignore => Ok(()),
        FaultPolicy::Warn => {
            tracing::warn!("Scene graph degraded: {}", error);
            Ok(())
        }
        FaultPolicy::Error => {
            tracing::error!("Scene graph rejected: {}", error);
            Err(error)
        }
    }
}
