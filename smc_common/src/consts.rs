//! System-wide constants for the SMC workspace.
//!
//! Single source of truth for telemetry capacity, the frame tick period
//! and the phase slots derived from it.

use static_assertions::const_assert;

/// Samples retained per telemetry ring buffer.
pub const TELEMETRY_CAPACITY: usize = 100;

/// Frame tick period. Each quantity is read and flushed at most once per period.
pub const TICK_PERIOD: u32 = 10;

/// Phase at which the actual position is sampled.
pub const POSITION_SAMPLE_PHASE: u32 = 0;

/// Phase at which the actual velocity is sampled.
pub const VELOCITY_SAMPLE_PHASE: u32 = 5;

/// Phase at which changed setpoints are dispatched to the driver.
///
/// Shared with position sampling; velocity reads stay staggered at
/// [`VELOCITY_SAMPLE_PHASE`].
pub const FLUSH_PHASE: u32 = POSITION_SAMPLE_PHASE;

/// Default serial device of the motor controller.
pub const DEFAULT_DEVICE_PATH: &str = "/dev/ttyUSB0";

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config/smc.toml";

/// Default interactive frame rate [Hz].
pub const DEFAULT_FRAME_RATE_HZ: u32 = 60;

const_assert!(TELEMETRY_CAPACITY > 0);
const_assert!(POSITION_SAMPLE_PHASE < TICK_PERIOD);
const_assert!(VELOCITY_SAMPLE_PHASE < TICK_PERIOD);
const_assert!(POSITION_SAMPLE_PHASE != VELOCITY_SAMPLE_PHASE);
