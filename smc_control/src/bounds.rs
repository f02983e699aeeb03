//! Soft UI bounds.
//!
//! Bounds shape the input range a widget offers to the operator. They are
//! advisory: each is kept inside the driver's hard limit, but commands are
//! re-checked against the hard limit at dispatch regardless.

use serde::{Deserialize, Serialize};
use smc_common::driver::MotorLimits;
use smc_common::mode::OperatingMode;

/// Inclusive `[min, max]` range with `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundRange {
    pub min: f64,
    pub max: f64,
}

impl BoundRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp `value` into the range.
    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    /// Range edit: `min` kept in `[0, limit]`, `max` kept in `[min, limit]`.
    fn edited(min: f64, max: f64, limit: f64) -> Self {
        let min = clamp_extent(min, limit);
        let max = clamp_extent(max, limit).max(min);
        Self { min, max }
    }
}

/// Per-mode soft bounds.
///
/// Position mode offers `±position_extent`, `velocity` and `acceleration`;
/// velocity mode offers `±velocity_extent` and the same `acceleration` range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftBounds {
    pub position_extent: f64,
    pub velocity: BoundRange,
    pub acceleration: BoundRange,
    pub velocity_extent: f64,
}

impl Default for SoftBounds {
    fn default() -> Self {
        Self {
            position_extent: 10_000.0,
            velocity: BoundRange::new(0.0, 20.0),
            acceleration: BoundRange::new(0.0, 20.0),
            velocity_extent: 20.0,
        }
    }
}

impl SoftBounds {
    /// Pull every bound inside the hard limits.
    pub fn clamped(self, limits: &MotorLimits) -> Self {
        Self {
            position_extent: clamp_extent(self.position_extent, limits.pt_limit),
            velocity: BoundRange::edited(self.velocity.min, self.velocity.max, limits.v_limit),
            acceleration: BoundRange::edited(
                self.acceleration.min,
                self.acceleration.max,
                limits.a_limit,
            ),
            velocity_extent: clamp_extent(self.velocity_extent, limits.v_limit),
        }
    }

    pub fn set_position_extent(&mut self, extent: f64, limits: &MotorLimits) {
        self.position_extent = clamp_extent(extent, limits.pt_limit);
    }

    pub fn set_velocity_range(&mut self, min: f64, max: f64, limits: &MotorLimits) {
        self.velocity = BoundRange::edited(min, max, limits.v_limit);
    }

    pub fn set_acceleration_range(&mut self, min: f64, max: f64, limits: &MotorLimits) {
        self.acceleration = BoundRange::edited(min, max, limits.a_limit);
    }

    pub fn set_velocity_extent(&mut self, extent: f64, limits: &MotorLimits) {
        self.velocity_extent = clamp_extent(extent, limits.v_limit);
    }

    /// Slider range of the position target.
    pub fn position_input(&self) -> BoundRange {
        BoundRange::new(-self.position_extent, self.position_extent)
    }

    /// Slider range of the velocity target in `mode`.
    pub fn velocity_input(&self, mode: OperatingMode) -> BoundRange {
        match mode {
            OperatingMode::Velocity => BoundRange::new(-self.velocity_extent, self.velocity_extent),
            _ => self.velocity,
        }
    }

    /// Slider range of the acceleration target.
    pub fn acceleration_input(&self) -> BoundRange {
        self.acceleration
    }

    /// Vertical range of the position plot. `None` means auto-scale.
    pub fn position_plot(&self, mode: OperatingMode) -> Option<BoundRange> {
        match mode {
            OperatingMode::Position => Some(self.position_input()),
            _ => None,
        }
    }

    /// Vertical range of the velocity plot.
    pub fn velocity_plot(&self, mode: OperatingMode) -> BoundRange {
        self.velocity_input(mode)
    }
}

/// Non-finite edits collapse to 0.
fn clamp_extent(value: f64, limit: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, limit.max(0.0))
    } else {
        0.0
    }
}
