//! # Transform Error Types
//!
//! All errors that can occur while building or configuring the scene graph.

use kinema_core::EntityId;
use thiserror::Error;

/// Errors that can occur in the transform pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// An entity was declared as its own parent.
    #[error("entity {entity:?} cannot be its own parent")]
    SelfParent {
        /// The offending entity.
        entity: EntityId,
    },

    /// Attach was called with the null entity.
    #[error("cannot attach the null entity")]
    NullEntity,

    /// The same entity was attached twice in one build.
    #[error("entity {entity:?} attached twice in one graph build")]
    AlreadyAttached {
        /// The entity attached twice.
        entity: EntityId,
    },

    /// Indexing reached a node that was already indexed.
    #[error("cycle detected in scene graph, {unindexed} nodes left unindexed")]
    CycleDetected {
        /// Nodes frozen at the identity sentinel.
        unindexed: usize,
    },

    /// Nodes not reachable from any root (orphaned or detached subtrees).
    #[error("{count} scene graph nodes are unreachable from any root")]
    UnreachableNodes {
        /// Nodes frozen at the identity sentinel.
        count: usize,
    },

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(String),
}

/// Result type for transform operations.
pub type TransformResult<T> = Result<T, TransformError>;
