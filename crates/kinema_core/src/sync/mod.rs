//! # Fixed-Step Frame State
//!
//! ## The Problem
//!
//! ```text
//! Simulation:  fixed 60 Hz steps   |----|----|----|----|
//! Rendering:   variable frame rate |--|-----|-|---|--|
//!
//! Rendering the latest step directly: visible stutter
//! ```
//!
//! ## The Solution: Double-Buffered Snapshots
//!
//! ```text
//! Step N:
//!   World transforms written to slot A (state_index)
//!   Slot B (prev_state_index) still holds step N-1
//!
//! Step N+1:
//!   FLIP (state_index ^= 1)
//!   World transforms written to slot B
//!   Render blends A -> B by the fraction of a step elapsed
//! ```

mod frame;

pub use frame::{FixedStepClock, FrameState};
