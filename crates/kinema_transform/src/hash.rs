//! # Node Hash
//!
//! Maps entity handles to node records. Separate chaining over a fixed
//! 1024-bucket table, with every node living in a paged [`NodePool`].
//!
//! There is no removal: the whole table is reset between rebuilds, which
//! keeps both the pool pages and the bucket table allocated.

use std::ops::{Index, IndexMut};

use kinema_core::{EntityId, NodePool};

use crate::node::{Node, NodeId};

/// Number of hash buckets. Must be a power of two.
pub const BUCKET_COUNT: usize = 1024;

const BUCKET_MASK: u32 = (BUCKET_COUNT - 1) as u32;

/// Entity to node lookup table.
pub struct NodeHash {
    buckets: Box<[Option<NodeId>]>,
    pool: NodePool<Node>,
}

impl NodeHash {
    /// Creates an empty table. No pool page is allocated until the first insert.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buckets: vec![None; BUCKET_COUNT].into_boxed_slice(),
            pool: NodePool::new(),
        }
    }

    #[inline]
    const fn bucket(key: EntityId) -> usize {
        (key.hash32() & BUCKET_MASK) as usize
    }

    /// Returns the node for `key`, creating it if absent.
    ///
    /// New nodes are pushed at the head of their bucket chain and start
    /// with no children, no sibling and index 0. Inserting an existing key
    /// allocates nothing.
    pub fn insert(&mut self, key: EntityId) -> NodeId {
        if let Some(id) = self.find(key) {
            return id;
        }

        let bucket = Self::bucket(key);
        let mut node = Node::new(key);
        node.next = self.buckets[bucket];

        let id = NodeId::from_handle(self.pool.allocate(node));
        self.buckets[bucket] = Some(id);
        id
    }

    /// Looks up `key` without inserting.
    #[must_use]
    pub fn find(&self, key: EntityId) -> Option<NodeId> {
        let mut cursor = self.buckets[Self::bucket(key)];
        while let Some(id) = cursor {
            let node = self.pool.get(id.handle())?;
            if node.key == key {
                return Some(id);
            }
            cursor = node.next;
        }
        None
    }

    /// Gets a node by id.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.pool.get(id.handle())
    }

    /// Gets a mutable node by id.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.pool.get_mut(id.handle())
    }

    /// Number of nodes in the table.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.pool.len()
    }

    /// Returns `true` if the table holds no nodes.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Number of pool pages currently held.
    #[inline]
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pool.page_count()
    }

    /// Iterates over every node in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.pool
            .iter()
            .map(|(handle, node)| (NodeId::from_handle(handle), node))
    }

    /// Drops every node. Pool pages and the bucket table are retained.
    pub fn clear(&mut self) {
        self.buckets.fill(None);
        self.pool.clear();
    }
}

impl Index<NodeId> for NodeHash {
    type Output = Node;

    /// # Panics
    ///
    /// Panics if `id` was issued before the last [`NodeHash::clear`].
    #[inline]
    fn index(&self, id: NodeId) -> &Node {
        match self.pool.get(id.handle()) {
            Some(node) => node,
            None => panic!("Stale NodeId {}", id.index()),
        }
    }
}

impl IndexMut<NodeId> for NodeHash {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        match self.pool.get_mut(id.handle()) {
            Some(node) => node,
            None => panic!("Stale NodeId {}", id.index()),
        }
    }
}

impl Default for NodeHash {
    fn default() -> Self {
        Self::new()
    }
}
