//! Error types of the control layer.
//!
//! `ControlError` is per-command and never fatal: the frame loop logs it
//! and carries on. `StartupError` aborts before the loop is entered.

use smc_common::config::ConfigError;
use smc_common::driver::{DriverError, Quantity};
use thiserror::Error;

/// Failure of a single hardware command or read.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ControlError {
    /// Value outside the driver-reported hard limit. Never sent.
    #[error("{quantity} {value} outside hard limit ±{limit}")]
    Range {
        quantity: Quantity,
        value: f64,
        limit: f64,
    },

    /// Transport failure reported by the driver.
    #[error(transparent)]
    Driver(#[from] DriverError),
}

/// Failure before the frame loop starts.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("driver: {0}")]
    Driver(#[from] DriverError),

    /// Initial hardware readback used to seed the setpoints failed.
    #[error("initial {quantity} readback failed: {source}")]
    Readback {
        quantity: Quantity,
        #[source]
        source: ControlError,
    },
}
