//! Frame state and the fixed-step accumulator that produces it.

/// Per-frame scheduling data consumed by the transform pipeline.
///
/// `state_index` is the world transform slot the current fixed step writes;
/// `prev_state_index` holds the step before it. `interpolate` is the
/// fraction of a fixed step elapsed since `state_index` was written.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameState {
    /// Slot written by the latest fixed step (0 or 1).
    pub state_index: usize,
    /// Slot written by the step before (always `state_index ^ 1`).
    pub prev_state_index: usize,
    /// Blend factor in `[0, 1]` between `prev_state_index` and `state_index`.
    pub interpolate: f32,
}

impl FrameState {
    /// Creates a frame state for `state_index` with blend factor `interpolate`.
    ///
    /// `interpolate` is clamped to `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn new(state_index: usize, interpolate: f32) -> Self {
        let state_index = state_index & 1;
        Self {
            state_index,
            prev_state_index: state_index ^ 1,
            interpolate: interpolate.clamp(0.0, 1.0),
        }
    }
}

impl Default for FrameState {
    fn default() -> Self {
        Self::new(0, 1.0)
    }
}

/// Accumulates variable frame time into fixed simulation steps.
///
/// ## Usage
///
/// ```rust,ignore
/// let mut clock = FixedStepClock::new(1.0 / 60.0, 4);
///
/// loop {
///     clock.accumulate(frame_dt);
///     while clock.try_step() {
///         simulate(FIXED_DT);
///         transforms.update(&mut world, &clock.frame())?;
///     }
///     transforms.present(&mut world, &clock.frame());
///     render(&world);
/// }
/// ```
#[derive(Clone, Debug)]
pub struct FixedStepClock {
    step: f32,
    max_steps: u32,
    accumulator: f32,
    state_index: usize,
    step_count: u64,
}

impl FixedStepClock {
    /// Creates a clock with a fixed step of `step` seconds that runs at most
    /// `max_steps` steps per frame.
    ///
    /// # Panics
    ///
    /// Panics if `step` is not a positive finite number or `max_steps` is zero.
    #[must_use]
    pub fn new(step: f32, max_steps: u32) -> Self {
        assert!(step.is_finite() && step > 0.0, "Fixed step must be positive");
        assert!(max_steps > 0, "At least one step per frame is required");
        Self {
            step,
            max_steps,
            accumulator: 0.0,
            state_index: 0,
            step_count: 0,
        }
    }

    /// Returns the fixed step length in seconds.
    #[inline]
    #[must_use]
    pub const fn step(&self) -> f32 {
        self.step
    }

    /// Returns the number of fixed steps taken so far.
    #[inline]
    #[must_use]
    pub const fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Returns the unconsumed time in seconds.
    #[inline]
    #[must_use]
    pub const fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Adds a frame's elapsed time.
    ///
    /// The backlog is capped at `max_steps` steps so a long stall cannot
    /// trigger an ever-growing catch-up loop. Negative and non-finite
    /// deltas are ignored.
    pub fn accumulate(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let cap = self.step * self.max_steps as f32;
        self.accumulator = (self.accumulator + dt).min(cap);
    }

    /// Consumes one fixed step if enough time has accumulated.
    ///
    /// On success the state slots flip: the slot written last becomes
    /// `prev_state_index` and the other one becomes the write slot.
    pub fn try_step(&mut self) -> bool {
        if self.accumulator < self.step {
            return false;
        }
        self.accumulator -= self.step;
        self.state_index ^= 1;
        self.step_count += 1;
        true
    }

    /// Returns the frame state for the current point in time.
    #[must_use]
    pub fn frame(&self) -> FrameState {
        FrameState::new(self.state_index, self.accumulator / self.step)
    }
}
