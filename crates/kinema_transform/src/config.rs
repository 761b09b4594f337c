//! # Transform Configuration
//!
//! Runtime policy for the transform pipeline, loaded once at startup.
//!
//! Structural constants (1024 hash buckets, 1024-node pages, the three
//! absolute override bits) are compile-time and not configurable.
//!
//! ```toml
//! cycle_policy = "error"
//! unreachable_policy = "warn"
//! interpolation = true
//! fixed_timestep = 0.016666668
//! max_steps_per_frame = 4
//! ```

use std::path::Path;

use kinema_core::FixedStepClock;
use serde::{Deserialize, Serialize};

use crate::error::{TransformError, TransformResult};

/// What to do when indexing leaves nodes behind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultPolicy {
    /// Report through `IndexReport` only.
    Ignore,
    /// Report and log a warning.
    #[default]
    Warn,
    /// Log an error and fail `finalize`.
    Error,
}

/// Transform pipeline configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Policy for nodes reached twice during indexing (cycles, double parents).
    pub cycle_policy: FaultPolicy,
    /// Policy for nodes no root can reach (parent never attached).
    pub unreachable_policy: FaultPolicy,
    /// Blend final transforms between fixed steps; when off, snap to the latest.
    pub interpolation: bool,
    /// Fixed simulation step in seconds.
    pub fixed_timestep: f32,
    /// Maximum fixed steps run per rendered frame.
    pub max_steps_per_frame: u32,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            cycle_policy: FaultPolicy::Error,
            unreachable_policy: FaultPolicy::Warn,
            interpolation: true,
            fixed_timestep: 1.0 / 60.0,
            max_steps_per_frame: 4,
        }
    }
}

impl TransformConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` on malformed TOML or out-of-range values.
    pub fn from_toml_str(source: &str) -> TransformResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| TransformError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, `InvalidConfig` otherwise.
    pub fn from_file(path: impl AsRef<Path>) -> TransformResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| TransformError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` describing the first bad value.
    pub fn validate(&self) -> TransformResult<()> {
        if !self.fixed_timestep.is_finite() || self.fixed_timestep <= 0.0 {
            return Err(TransformError::InvalidConfig(format!(
                "fixed_timestep must be positive, got {}",
                self.fixed_timestep
            )));
        }
        if self.max_steps_per_frame == 0 {
            return Err(TransformError::InvalidConfig(
                "max_steps_per_frame must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds the fixed-step clock described by this config.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the config does not validate.
    pub fn clock(&self) -> TransformResult<FixedStepClock> {
        self.validate()?;
        Ok(FixedStepClock::new(
            self.fixed_timestep,
            self.max_steps_per_frame,
        ))
    }
}
