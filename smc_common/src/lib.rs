//! SMC Common Library
//!
//! Shared types, the motor driver contract and configuration loading
//! utilities for all SMC workspace crates.
//!
//! # Module Structure
//!
//! - [`consts`] - Telemetry capacity, tick period and phase slots
//! - [`mode`] - Operating modes and the selector-widget adapter
//! - [`driver`] - `MotorDriver` trait, limits, defaults and errors
//! - [`config`] - Configuration loading traits and types
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use smc_common::prelude::*;
//!
//! assert_eq!(OperatingMode::from_index(1), Some(OperatingMode::Velocity));
//! ```

pub mod config;
pub mod consts;
pub mod driver;
pub mod mode;
pub mod prelude;
