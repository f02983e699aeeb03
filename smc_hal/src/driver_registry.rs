//! Driver registry for motor drivers.
//!
//! Provides a `DriverRegistry` struct for registering driver factories and
//! opening drivers by name. Constructed at startup and passed by value;
//! there is no global registry.

use smc_common::driver::{DriverConfig, DriverError, DriverFactory, MotorDriver};
use std::collections::HashMap;
use tracing::info;

/// Registry of available motor drivers.
pub struct DriverRegistry {
    factories: HashMap<&'static str, DriverFactory>,
}

impl DriverRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Create a registry holding every built-in driver.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        crate::drivers::register_builtin(&mut registry);
        registry
    }

    /// Register a driver factory.
    ///
    /// # Panics
    /// Panics if a driver with the same name is already registered.
    pub fn register(&mut self, name: &'static str, factory: DriverFactory) {
        if self.factories.contains_key(name) {
            panic!("Driver '{name}' is already registered");
        }
        self.factories.insert(name, factory);
    }

    /// Get a driver factory by name.
    pub fn get_factory(&self, name: &str) -> Option<DriverFactory> {
        self.factories.get(name).copied()
    }

    /// Open the driver selected by `config.name` on `config.device_path`.
    ///
    /// # Errors
    /// Returns `DriverError::NotFound` if no driver with that name is registered,
    /// or whatever the driver's factory reports when the transport cannot be opened.
    pub fn open(&self, config: &DriverConfig) -> Result<Box<dyn MotorDriver>, DriverError> {
        let factory = self
            .get_factory(&config.name)
            .ok_or_else(|| DriverError::NotFound(config.name.clone()))?;
        let driver = factory(config)?;
        info!(
            "Opened '{}' driver on {}",
            driver.name(),
            config.device_path
        );
        Ok(driver)
    }

    /// List all registered driver names.
    pub fn list_drivers(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::new()
    }
}
