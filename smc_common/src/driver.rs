//! Motor driver trait and error types.
//!
//! This module defines:
//! - `MotorDriver` trait - Interface consumed by the control core
//! - `DriverError` enum - Error types for driver operations
//! - `DriverFactory` type alias - Factory function type
//! - `MotorLimits` / `MotionDefaults` - Values reported by the controller
//! - `DriverConfig` - Device path and simulation parameters

use crate::consts::DEFAULT_DEVICE_PATH;
use crate::mode::DriveMode;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error types for driver operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DriverError {
    /// Transport could not be opened.
    #[error("Failed to open {path}: {reason}")]
    OpenFailed {
        /// Device path that was opened.
        path: String,
        /// Underlying cause.
        reason: String,
    },

    /// Read or write over the transport failed.
    #[error("Hardware communication error: {0}")]
    Communication(String),

    /// Driver not found in the registry.
    #[error("Driver not found: {0}")]
    NotFound(String),
}

/// Commanded quantity, used to pick the matching hard limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    Position,
    Velocity,
    Acceleration,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Position => "position",
            Self::Velocity => "velocity",
            Self::Acceleration => "acceleration",
        })
    }
}

/// Absolute bounds the hardware cannot exceed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorLimits {
    /// Position extent, symmetric around the origin.
    pub pt_limit: f64,
    /// Velocity magnitude.
    pub v_limit: f64,
    /// Acceleration magnitude.
    pub a_limit: f64,
}

impl MotorLimits {
    /// Hard limit for a quantity.
    #[inline]
    pub const fn limit_for(&self, quantity: Quantity) -> f64 {
        match quantity {
            Quantity::Position => self.pt_limit,
            Quantity::Velocity => self.v_limit,
            Quantity::Acceleration => self.a_limit,
        }
    }

    /// `true` if `value` is finite and within the hard limit of `quantity`.
    #[inline]
    pub fn admits(&self, quantity: Quantity, value: f64) -> bool {
        value.is_finite() && value.abs() <= self.limit_for(quantity)
    }
}

impl Default for MotorLimits {
    fn default() -> Self {
        Self {
            pt_limit: 100_000.0,
            v_limit: 50.0,
            a_limit: 50.0,
        }
    }
}

/// Profile values the controller applies after power-up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionDefaults {
    pub default_velocity: f64,
    pub default_acceleration: f64,
}

impl Default for MotionDefaults {
    fn default() -> Self {
        Self {
            default_velocity: 10.0,
            default_acceleration: 10.0,
        }
    }
}

/// Parameters used when a driver is simulated instead of opened on hardware.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    pub limits: MotorLimits,
    pub defaults: MotionDefaults,
}

impl SimulationParams {
    /// Check that limits are finite and non-negative and defaults are finite.
    ///
    /// Returns the offending field (relative to the simulation table) and value.
    pub fn validate(&self) -> Result<(), (&'static str, f64)> {
        let l = &self.limits;
        for (name, value) in [
            ("limits.pt_limit", l.pt_limit),
            ("limits.v_limit", l.v_limit),
            ("limits.a_limit", l.a_limit),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err((name, value));
            }
        }
        let d = &self.defaults;
        for (name, value) in [
            ("defaults.default_velocity", d.default_velocity),
            ("defaults.default_acceleration", d.default_acceleration),
        ] {
            if !value.is_finite() {
                return Err((name, value));
            }
        }
        Ok(())
    }
}

/// Driver selection and transport configuration.
///
/// # TOML Example
///
/// ```toml
/// [driver]
/// name = "simulation"
/// device_path = "/dev/ttyUSB0"
///
/// [driver.simulation.limits]
/// pt_limit = 100000.0
/// v_limit = 50.0
/// a_limit = 50.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Registered driver name.
    pub name: String,
    /// Device path of the transport.
    pub device_path: String,
    /// Simulation parameters (ignored by hardware drivers).
    pub simulation: SimulationParams,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            name: "simulation".to_string(),
            device_path: DEFAULT_DEVICE_PATH.to_string(),
            simulation: SimulationParams::default(),
        }
    }
}

/// Factory function type for opening driver instances.
pub type DriverFactory = fn(&DriverConfig) -> Result<Box<dyn MotorDriver>, DriverError>;

/// Trait defining the motor controller as seen by the control core.
///
/// Every call is synchronous and blocks until the transport answers.
/// Writes are fire-and-forget: any framing or acknowledgement protocol
/// below this interface belongs to the driver.
pub trait MotorDriver: Send {
    /// Returns the driver's unique identifier (e.g., "simulation").
    fn name(&self) -> &'static str;

    /// Hard limits reported by the controller.
    fn limits(&self) -> MotorLimits;

    /// Profile defaults reported by the controller.
    fn defaults(&self) -> MotionDefaults;

    /// Read the actual position.
    fn position(&mut self) -> Result<f64, DriverError>;

    /// Read the actual velocity.
    fn velocity(&mut self) -> Result<f64, DriverError>;

    /// Switch the controller's control mode.
    fn set_mode(&mut self, mode: DriveMode) -> Result<(), DriverError>;

    /// Set the profile velocity (position mode) or the commanded velocity (velocity mode).
    fn set_velocity(&mut self, velocity: f64) -> Result<(), DriverError>;

    /// Set the profile acceleration.
    fn set_acceleration(&mut self, acceleration: f64) -> Result<(), DriverError>;

    /// Start an absolute move to `position`.
    fn go_absolute_position(&mut self, position: f64) -> Result<(), DriverError>;

    /// Engage the commanded velocity.
    fn go(&mut self) -> Result<(), DriverError>;

    /// Stop any motion.
    fn stop(&mut self) -> Result<(), DriverError>;

    /// Declare the current position as the origin.
    fn set_origin(&mut self) -> Result<(), DriverError>;
}

impl<D: MotorDriver + ?Sized> MotorDriver for Box<D> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn limits(&self) -> MotorLimits {
        (**self).limits()
    }

    fn defaults(&self) -> MotionDefaults {
        (**self).defaults()
    }

    fn position(&mut self) -> Result<f64, DriverError> {
        (**self).position()
    }

    fn velocity(&mut self) -> Result<f64, DriverError> {
        (**self).velocity()
    }

    fn set_mode(&mut self, mode: DriveMode) -> Result<(), DriverError> {
        (**self).set_mode(mode)
    }

    fn set_velocity(&mut self, velocity: f64) -> Result<(), DriverError> {
        (**self).set_velocity(velocity)
    }

    fn set_acceleration(&mut self, acceleration: f64) -> Result<(), DriverError> {
        (**self).set_acceleration(acceleration)
    }

    fn go_absolute_position(&mut self, position: f64) -> Result<(), DriverError> {
        (**self).go_absolute_position(position)
    }

    fn go(&mut self) -> Result<(), DriverError> {
        (**self).go()
    }

    fn stop(&mut self) -> Result<(), DriverError> {
        (**self).stop()
    }

    fn set_origin(&mut self) -> Result<(), DriverError> {
        (**self).set_origin()
    }
}
