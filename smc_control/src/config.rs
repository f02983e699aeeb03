//! Console configuration.
//!
//! One TOML file: shared section, driver selection, frame pacing, initial
//! soft bounds and the optional startup exercise. Every section has defaults,
//! so a missing file means "simulation on the default device, 60 Hz".
//!
//! # TOML Example
//!
//! ```toml
//! [shared]
//! log_level = "info"
//! service_name = "smc-console"
//!
//! [driver]
//! name = "simulation"
//! device_path = "/dev/ttyUSB0"
//!
//! [frame]
//! rate_hz = 60
//! report_every = 60
//!
//! [bounds]
//! position_extent = 10000.0
//! velocity_extent = 20.0
//! velocity = { min = 0.0, max = 20.0 }
//! acceleration = { min = 0.0, max = 20.0 }
//!
//! [startup]
//! exercise = true
//! travel = 1000.0
//! settle_ms = 1000
//! ```

use serde::{Deserialize, Serialize};
use smc_common::config::{ConfigError, ConfigLoader, SharedConfig};
use smc_common::consts::DEFAULT_FRAME_RATE_HZ;
use smc_common::driver::DriverConfig;
use std::path::Path;
use std::time::Duration;

use crate::bounds::SoftBounds;

/// Frame pacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Target frame rate [Hz]. The loop sleeps the remainder of each frame.
    pub rate_hz: u32,
    /// Console telemetry line every N frames (0 disables).
    pub report_every: u64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            rate_hz: DEFAULT_FRAME_RATE_HZ,
            report_every: DEFAULT_FRAME_RATE_HZ as u64,
        }
    }
}

/// Out-and-back move run once before the frame loop starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupConfig {
    pub exercise: bool,
    /// Absolute position of the outbound move.
    pub travel: f64,
    /// Wait after each move [ms].
    pub settle_ms: u64,
}

impl StartupConfig {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            exercise: false,
            travel: 1000.0,
            settle_ms: 1000,
        }
    }
}

/// Top-level console configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub shared: SharedConfig,
    pub driver: DriverConfig,
    pub frame: FrameConfig,
    pub bounds: SoftBounds,
    pub startup: StartupConfig,
}

impl ConsoleConfig {
    /// Load from `path`, or fall back to defaults if the file does not exist.
    ///
    /// Returns the config and whether the file was found.
    pub fn load_or_default(path: &Path) -> Result<(Self, bool), ConfigError> {
        match Self::load(path) {
            Ok(config) => Ok((config, true)),
            Err(ConfigError::FileNotFound) => Ok((Self::default(), false)),
            Err(e) => Err(e),
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if:
    /// - `shared.service_name` is empty
    /// - `driver.name` or `driver.device_path` is empty
    /// - `frame.rate_hz` is zero
    /// - a simulated hard limit is negative or not finite
    /// - any soft bound is negative or not finite
    /// - the startup travel is not finite
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;

        if self.driver.name.is_empty() {
            return Err(ConfigError::ValidationError(
                "driver.name cannot be empty".to_string(),
            ));
        }
        if self.driver.device_path.is_empty() {
            return Err(ConfigError::ValidationError(
                "driver.device_path cannot be empty".to_string(),
            ));
        }
        if self.frame.rate_hz == 0 {
            return Err(ConfigError::ValidationError(
                "frame.rate_hz must be positive".to_string(),
            ));
        }

        if let Err((field, value)) = self.driver.simulation.validate() {
            return Err(ConfigError::ValidationError(format!(
                "driver.simulation.{field} is invalid: {value}"
            )));
        }

        let b = &self.bounds;
        for (name, value) in [
            ("bounds.position_extent", b.position_extent),
            ("bounds.velocity_extent", b.velocity_extent),
            ("bounds.velocity.min", b.velocity.min),
            ("bounds.velocity.max", b.velocity.max),
            ("bounds.acceleration.min", b.acceleration.min),
            ("bounds.acceleration.max", b.acceleration.max),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        if !self.startup.travel.is_finite() {
            return Err(ConfigError::ValidationError(
                "startup.travel must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
