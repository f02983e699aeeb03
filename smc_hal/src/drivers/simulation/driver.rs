//! Simulation driver implementation.
//!
//! `SimulatedMotor` implements `MotorDriver` on top of [`MotorSimulator`].
//! In real-time operation the physics are advanced by the wall-clock time
//! elapsed since the previous driver call; a frozen instance only advances
//! through [`SimulatedMotor::advance`].

use super::physics::MotorSimulator;
use smc_common::driver::{DriverConfig, DriverError, MotionDefaults, MotorDriver, MotorLimits};
use smc_common::mode::DriveMode;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Simulation driver implementing the `MotorDriver` trait.
pub struct SimulatedMotor {
    sim: MotorSimulator,
    limits: MotorLimits,
    defaults: MotionDefaults,
    /// Wall-clock reference, `None` when frozen.
    last_update: Option<Instant>,
}

impl SimulatedMotor {
    /// "Open" the simulated controller on `config.device_path`.
    ///
    /// # Errors
    /// Returns `DriverError::OpenFailed` if the device path is empty.
    pub fn open(config: &DriverConfig) -> Result<Self, DriverError> {
        if config.device_path.trim().is_empty() {
            return Err(DriverError::OpenFailed {
                path: config.device_path.clone(),
                reason: "empty device path".to_string(),
            });
        }
        if let Err((field, value)) = config.simulation.validate() {
            return Err(DriverError::OpenFailed {
                path: config.device_path.clone(),
                reason: format!("invalid simulation {field}: {value}"),
            });
        }
        let mut motor = Self::frozen(config.simulation.limits, config.simulation.defaults);
        motor.last_update = Some(Instant::now());
        info!(
            "Simulated motor on {}: pt_limit={}, v_limit={}, a_limit={}",
            config.device_path, motor.limits.pt_limit, motor.limits.v_limit, motor.limits.a_limit
        );
        Ok(motor)
    }

    /// Create a simulated controller that only moves through [`Self::advance`].
    pub fn frozen(limits: MotorLimits, defaults: MotionDefaults) -> Self {
        Self {
            sim: MotorSimulator::new(
                limits,
                defaults.default_velocity,
                defaults.default_acceleration,
            ),
            limits,
            defaults,
            last_update: None,
        }
    }

    /// Advance the physics by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.sim.step(dt.as_secs_f64());
    }

    /// Underlying simulator state.
    pub fn simulator(&self) -> &MotorSimulator {
        &self.sim
    }

    /// Catch the physics up with the wall clock.
    fn sync(&mut self) {
        if let Some(last) = self.last_update {
            let now = Instant::now();
            self.sim.step(now.duration_since(last).as_secs_f64());
            self.last_update = Some(now);
        }
    }
}

impl MotorDriver for SimulatedMotor {
    fn name(&self) -> &'static str {
        "simulation"
    }

    fn limits(&self) -> MotorLimits {
        self.limits
    }

    fn defaults(&self) -> MotionDefaults {
        self.defaults
    }

    fn position(&mut self) -> Result<f64, DriverError> {
        self.sync();
        Ok(self.sim.position())
    }

    fn velocity(&mut self) -> Result<f64, DriverError> {
        self.sync();
        Ok(self.sim.velocity())
    }

    fn set_mode(&mut self, mode: DriveMode) -> Result<(), DriverError> {
        self.sync();
        debug!("sim: set_mode({mode:?})");
        self.sim.set_mode(mode);
        Ok(())
    }

    fn set_velocity(&mut self, velocity: f64) -> Result<(), DriverError> {
        self.sync();
        self.sim.set_velocity(velocity);
        Ok(())
    }

    fn set_acceleration(&mut self, acceleration: f64) -> Result<(), DriverError> {
        self.sync();
        self.sim.set_acceleration(acceleration);
        Ok(())
    }

    fn go_absolute_position(&mut self, position: f64) -> Result<(), DriverError> {
        self.sync();
        self.sim.go_absolute_position(position);
        Ok(())
    }

    fn go(&mut self) -> Result<(), DriverError> {
        self.sync();
        self.sim.go();
        Ok(())
    }

    fn stop(&mut self) -> Result<(), DriverError> {
        self.sync();
        self.sim.stop();
        Ok(())
    }

    fn set_origin(&mut self) -> Result<(), DriverError> {
        self.sync();
        self.sim.set_origin();
        Ok(())
    }
}
