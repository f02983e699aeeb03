//! Prelude module for common re-exports.
//!
//! ```rust
//! use smc_common::prelude::*;
//! ```

use std::time::Duration;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{
    FLUSH_PHASE, POSITION_SAMPLE_PHASE, TELEMETRY_CAPACITY, TICK_PERIOD, VELOCITY_SAMPLE_PHASE,
};

// ─── Driver Contract ────────────────────────────────────────────────
pub use crate::driver::{
    DriverConfig, DriverError, DriverFactory, MotionDefaults, MotorDriver, MotorLimits, Quantity,
    SimulationParams,
};

// ─── Modes ──────────────────────────────────────────────────────────
pub use crate::mode::{DriveMode, OperatingMode};

/// Frame budget for a given frame rate.
///
/// A zero rate yields a zero budget (unpaced loop).
pub fn frame_budget(frame_rate_hz: u32) -> Duration {
    if frame_rate_hz == 0 {
        Duration::ZERO
    } else {
        Duration::from_secs_f64(1.0 / frame_rate_hz as f64)
    }
}
