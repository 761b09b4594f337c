//! # Topological Indexer
//!
//! Assigns every reachable node a dense index such that a parent always
//! precedes its children:
//!
//! ```text
//! hierarchy: [ 0 | 0  0  0 | 1  1  2  3  4  4 ... ]
//!              ^   ^roots^   ^ children, breadth-first
//!              sentinel
//! ```
//!
//! Index 0 is a sentinel that reads as identity. Roots take
//! `[1, num_root_nodes)` and store parent 0. Every later entry stores its
//! parent's index, which is always smaller than its own.

use crate::hash::NodeHash;
use crate::node::NodeId;

/// Outcome of one indexing pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IndexReport {
    /// Nodes in the graph, including parents that were never attached.
    pub node_count: usize,
    /// Nodes that received a dense index.
    pub indexed: usize,
    /// Nodes left at the sentinel index.
    pub unindexed: usize,
    /// End of the root range: roots occupy `[1, num_root_nodes)`.
    pub num_root_nodes: usize,
    /// The walk reached a node that already had an index.
    pub cycle_detected: bool,
}

impl IndexReport {
    /// Returns `true` if every node was indexed.
    #[inline]
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.unindexed == 0 && !self.cycle_detected
    }
}

/// Indexes the graph whose root list starts at `roots`.
///
/// `hierarchy` receives the parent-index table and `order` receives the
/// node at each index (`order[i - 1]` holds index `i`). Both are cleared
/// first, so their capacity carries over between rebuilds.
///
/// A list that leads back to an already indexed node is abandoned at that
/// point. The pass therefore always terminates and never assigns a node
/// twice, at the cost of leaving the rest of that list at index 0.
pub fn build_index(
    nodes: &mut NodeHash,
    roots: Option<NodeId>,
    hierarchy: &mut Vec<u32>,
    order: &mut Vec<NodeId>,
) -> IndexReport {
    reset_indices(nodes);

    hierarchy.clear();
    order.clear();
    hierarchy.push(0);

    let mut cycle_detected = !assign_list(nodes, roots, 0, hierarchy, order);
    let num_root_nodes = hierarchy.len();

    // `order` grows while we walk it: that is the breadth-first queue
    let mut head = 0;
    while head < order.len() {
        let parent = order[head];
        head += 1;

        let children = nodes[parent].children;
        if !assign_list(nodes, children, head as u32, hierarchy, order) {
            cycle_detected = true;
        }
    }

    let node_count = nodes.len();
    let indexed = order.len();
    IndexReport {
        node_count,
        indexed,
        unindexed: node_count - indexed,
        num_root_nodes,
        cycle_detected,
    }
}

/// Indexes one sibling list. Returns `false` if it ran into an indexed node.
fn assign_list(
    nodes: &mut NodeHash,
    first: Option<NodeId>,
    parent_index: u32,
    hierarchy: &mut Vec<u32>,
    order: &mut Vec<NodeId>,
) -> bool {
    let mut cursor = first;
    while let Some(id) = cursor {
        let node = &mut nodes[id];
        if node.is_indexed() {
            return false;
        }
        node.index = hierarchy.len() as u32;
        hierarchy.push(parent_index);
        order.push(id);
        cursor = node.next_sibling;
    }
    true
}

fn reset_indices(nodes: &mut NodeHash) {
    for raw in 0..nodes.len() as u32 {
        if let Some(node) = nodes.get_mut(NodeId::from_raw(raw)) {
            node.index = 0;
        }
    }
}
