//! # Memory Management
//!
//! Paged pools for records that live for exactly one scene graph build.
//!
//! ## Design Philosophy
//!
//! Pages are allocated on first use and kept for the process lifetime:
//! - No per-record heap allocation
//! - No per-record free
//! - O(1) bulk reset between rebuilds

mod pool;

pub use pool::{NodePool, PoolHandle, PAGE_SIZE};
