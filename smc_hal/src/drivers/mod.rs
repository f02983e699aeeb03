//! Motor driver implementations.
//!
//! - [`simulation`] - Kinematic motor simulation for development and testing
//!
//! # Adding New Drivers
//!
//! 1. Create a new submodule under `drivers/`
//! 2. Implement the `MotorDriver` trait from `smc_common::driver`
//! 3. Register its factory in [`register_builtin`]

pub mod simulation;

use crate::driver_registry::DriverRegistry;

/// Register all built-in drivers.
pub fn register_builtin(registry: &mut DriverRegistry) {
    registry.register("simulation", simulation::open_driver);
}
