//! # KINEMA Transform
//!
//! Scene graph hierarchy and world transform propagation.
//!
//! ## Pipeline
//!
//! ```text
//! attach* ─► finalize ─► set_local_transform* ─► calc_world_transform ─► readback ─► present
//!  (topology change only)        (every fixed step)                                  (every frame)
//! ```
//!
//! - [`hash::NodeHash`] maps entity handles to pooled node records
//! - [`index`] lays nodes out breadth-first so parents precede children
//! - [`composer`] composes world transforms in one forward pass
//! - [`interpolation`] blends the last two fixed steps for rendering
//! - [`TransformSystem`] drives all of the above from a `kinema_core::World`
//!
//! ## Example
//!
//! ```rust,ignore
//! use kinema_transform::{TransformConfig, TransformSystem};
//!
//! let config = TransformConfig::from_file("transform.toml")?;
//! let mut clock = config.clock()?;
//! let mut transforms = TransformSystem::new(config);
//!
//! clock.accumulate(frame_dt);
//! while clock.try_step() {
//!     transforms.update(&mut world, &clock.frame())?;
//! }
//! transforms.present(&mut world, &clock.frame());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod buffers;
pub mod composer;
pub mod config;
pub mod error;
pub mod graph;
pub mod hash;
pub mod index;
pub mod interpolation;
pub mod node;
pub mod system;

pub use buffers::TransformBuffers;
pub use config::{FaultPolicy, TransformConfig};
pub use error::{TransformError, TransformResult};
pub use graph::{Phase, SceneGraph};
pub use hash::{NodeHash, BUCKET_COUNT};
pub use index::IndexReport;
pub use node::{Node, NodeId};
pub use system::{TransformSystem, UpdateStats};
