//! # SMC HAL Library
//!
//! Motor driver implementations with a pluggable registry.
//! Drivers implement the `MotorDriver` trait defined in `smc_common::driver`.
//!
//! # Module Structure
//!
//! - [`driver_registry`] - Driver factory registration
//! - [`drivers`] - Driver implementations
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   smc_hal                                │
//! │  ┌──────────────────┐        ┌─────────────────────┐     │
//! │  │  DriverRegistry  │──open─►│  MotorDriver        │     │
//! │  │  name → factory  │        │  (trait object)     │     │
//! │  └──────────────────┘        └─────────┬───────────┘     │
//! │                                        │                 │
//! │                              ┌─────────▼───────────┐     │
//! │                              │  SimulatedMotor     │     │
//! │                              └─────────────────────┘     │
//! └──────────────────────────────────────────────────────────┘
//! ```

#![deny(missing_docs)]

pub mod driver_registry;
pub mod drivers;

pub use crate::driver_registry::DriverRegistry;
pub use crate::drivers::simulation::SimulatedMotor;
