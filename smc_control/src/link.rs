//! Command gate in front of the motor driver.
//!
//! Every hardware read and write of the control layer passes through
//! [`MotorLink`]. Setpoint writes are checked against the driver-reported
//! hard limits first; a value outside them is dropped with a
//! [`ControlError::Range`] and never reaches the transport. Failures are
//! logged and counted here so callers only decide what to do with state.

use smc_common::driver::{MotorDriver, MotorLimits, Quantity};
use smc_common::mode::DriveMode;
use tracing::{debug, warn};

use crate::error::ControlError;

/// Counters of link activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    /// Commands accepted by the driver.
    pub commands_sent: u64,
    /// Commands dropped by the hard-limit check.
    pub commands_rejected: u64,
    /// Commands the driver reported as failed.
    pub commands_failed: u64,
    /// Failed reads.
    pub read_failures: u64,
}

/// Owns the driver and its hard limits for the lifetime of the session.
pub struct MotorLink<D> {
    driver: D,
    limits: MotorLimits,
    stats: LinkStats,
}

impl<D: MotorDriver> MotorLink<D> {
    /// Wrap `driver`, caching the hard limits it reports.
    pub fn new(driver: D) -> Self {
        let limits = driver.limits();
        Self {
            driver,
            limits,
            stats: LinkStats::default(),
        }
    }

    #[inline]
    pub fn limits(&self) -> &MotorLimits {
        &self.limits
    }

    #[inline]
    pub fn stats(&self) -> LinkStats {
        self.stats
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn read_position(&mut self) -> Result<f64, ControlError> {
        let result = self.driver.position().map_err(ControlError::from);
        self.count_read(&result);
        result
    }

    pub fn read_velocity(&mut self) -> Result<f64, ControlError> {
        let result = self.driver.velocity().map_err(ControlError::from);
        self.count_read(&result);
        result
    }

    pub fn set_mode(&mut self, mode: DriveMode) -> Result<(), ControlError> {
        let result = self.driver.set_mode(mode).map_err(ControlError::from);
        self.finish("set_mode", format_args!("{mode:?}"), result)
    }

    pub fn set_velocity(&mut self, velocity: f64) -> Result<(), ControlError> {
        let result = self
            .admit(Quantity::Velocity, velocity)
            .and_then(|v| Ok(self.driver.set_velocity(v)?));
        self.finish("set_velocity", format_args!("{velocity}"), result)
    }

    pub fn set_acceleration(&mut self, acceleration: f64) -> Result<(), ControlError> {
        let result = self
            .admit(Quantity::Acceleration, acceleration)
            .and_then(|a| Ok(self.driver.set_acceleration(a)?));
        self.finish("set_acceleration", format_args!("{acceleration}"), result)
    }

    pub fn go_absolute_position(&mut self, position: f64) -> Result<(), ControlError> {
        let result = self
            .admit(Quantity::Position, position)
            .and_then(|p| Ok(self.driver.go_absolute_position(p)?));
        self.finish("go_absolute_position", format_args!("{position}"), result)
    }

    pub fn go(&mut self) -> Result<(), ControlError> {
        let result = self.driver.go().map_err(ControlError::from);
        self.finish("go", format_args!(""), result)
    }

    pub fn stop(&mut self) -> Result<(), ControlError> {
        let result = self.driver.stop().map_err(ControlError::from);
        self.finish("stop", format_args!(""), result)
    }

    pub fn set_origin(&mut self) -> Result<(), ControlError> {
        let result = self.driver.set_origin().map_err(ControlError::from);
        self.finish("set_origin", format_args!(""), result)
    }

    fn admit(&self, quantity: Quantity, value: f64) -> Result<f64, ControlError> {
        if self.limits.admits(quantity, value) {
            Ok(value)
        } else {
            Err(ControlError::Range {
                quantity,
                value,
                limit: self.limits.limit_for(quantity),
            })
        }
    }

    fn count_read<T>(&mut self, result: &Result<T, ControlError>) {
        if result.is_err() {
            self.stats.read_failures += 1;
        }
    }

    fn finish(
        &mut self,
        command: &str,
        arg: std::fmt::Arguments<'_>,
        result: Result<(), ControlError>,
    ) -> Result<(), ControlError> {
        match &result {
            Ok(()) => {
                self.stats.commands_sent += 1;
                debug!("{command}({arg})");
            }
            Err(e @ ControlError::Range { .. }) => {
                self.stats.commands_rejected += 1;
                warn!("Dropped {command}({arg}): {e}");
            }
            Err(e) => {
                self.stats.commands_failed += 1;
                warn!("{command}({arg}) failed: {e}");
            }
        }
        result
    }
}
