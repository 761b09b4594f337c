//! Scene graph node records.

use kinema_core::{EntityId, PoolHandle};

/// Stable handle to a node inside one graph build.
///
/// A `NodeId` is an index into the graph's node pool. It stays valid until
/// the graph is cleared for the next rebuild.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Returns the raw pool index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) const fn from_raw(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub(crate) const fn from_handle(handle: PoolHandle) -> Self {
        Self(handle.index())
    }

    #[inline]
    pub(crate) const fn handle(self) -> PoolHandle {
        PoolHandle::from_raw(self.0)
    }
}

/// One scene graph node.
///
/// Nodes form three intrusive singly-linked lists at once: the hash bucket
/// chain (`next`), the node's own children (`children`), and the sibling list
/// the node sits in (`next_sibling`, which is the root list for roots).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Node {
    /// Entity this node represents.
    pub key: EntityId,
    /// Next node in the same hash bucket.
    pub next: Option<NodeId>,
    /// First child.
    pub children: Option<NodeId>,
    /// Next child of the same parent, or next root.
    pub next_sibling: Option<NodeId>,
    /// Dense topological index. `0` means not indexed.
    pub index: u32,
    /// Set once the node's own entity has been attached.
    ///
    /// Nodes created only because another entity named them as parent stay
    /// unattached and are never reachable from the root list.
    pub attached: bool,
}

impl Node {
    /// Creates a detached, unindexed node for `key`.
    #[inline]
    #[must_use]
    pub const fn new(key: EntityId) -> Self {
        Self {
            key,
            next: None,
            children: None,
            next_sibling: None,
            index: 0,
            attached: false,
        }
    }

    /// Returns `true` once the indexer has given this node a slot.
    #[inline]
    #[must_use]
    pub const fn is_indexed(&self) -> bool {
        self.index != 0
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new(EntityId::NULL)
    }
}
