//! Simulation driver module.
//!
//! Software-emulated motor controller for development and testing
//! without a serial link.

mod driver;
mod physics;

pub use driver::SimulatedMotor;
pub use physics::MotorSimulator;

use smc_common::driver::{DriverConfig, DriverError, MotorDriver};

/// Factory function to open a simulation driver instance.
pub fn open_driver(config: &DriverConfig) -> Result<Box<dyn MotorDriver>, DriverError> {
    Ok(Box::new(SimulatedMotor::open(config)?))
}
