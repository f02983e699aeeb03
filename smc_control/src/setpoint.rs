//! Operator setpoints and their change detectors.
//!
//! Every setpoint carries a shadow: the value most recently dispatched for
//! it. A detector dispatches a quantity only when its live target differs
//! from the shadow (strict inequality, no tolerance) and moves the shadow
//! only after the driver accepted the command. Quantities are dispatched
//! independently and in a fixed order.

use smc_common::driver::{MotionDefaults, MotorDriver};
use tracing::debug;

use crate::link::MotorLink;

/// A live target and the last value dispatched for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Setpoint {
    target: f64,
    shadow: f64,
}

impl Setpoint {
    /// Target and shadow both at `value`.
    pub const fn new(value: f64) -> Self {
        Self {
            target: value,
            shadow: value,
        }
    }

    #[inline]
    pub const fn target(&self) -> f64 {
        self.target
    }

    #[inline]
    pub const fn shadow(&self) -> f64 {
        self.shadow
    }

    pub fn set_target(&mut self, value: f64) {
        self.target = value;
    }

    /// Target diverges from the last dispatched value.
    #[inline]
    #[allow(clippy::float_cmp)]
    pub fn is_dirty(&self) -> bool {
        self.target != self.shadow
    }

    /// Record `value` as dispatched.
    pub fn mark_applied(&mut self, value: f64) {
        self.shadow = value;
    }

    /// Force target and shadow to `value` (manual bypass actions).
    pub fn reset(&mut self, value: f64) {
        self.target = value;
        self.shadow = value;
    }
}

/// Position-mode targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSetpoints {
    pub position: Setpoint,
    pub velocity: Setpoint,
    pub acceleration: Setpoint,
}

impl PositionSetpoints {
    pub fn new(position: f64, defaults: &MotionDefaults) -> Self {
        Self {
            position: Setpoint::new(position),
            velocity: Setpoint::new(defaults.default_velocity),
            acceleration: Setpoint::new(defaults.default_acceleration),
        }
    }

    /// Dispatch changed quantities: position, then velocity, then acceleration.
    pub fn flush<D: MotorDriver>(&mut self, link: &mut MotorLink<D>) {
        if self.position.is_dirty() {
            let p = self.position.target();
            if link.go_absolute_position(p).is_ok() {
                self.position.mark_applied(p);
            }
        }
        if self.velocity.is_dirty() {
            let v = self.velocity.target();
            if link.set_velocity(v).is_ok() {
                self.velocity.mark_applied(v);
            }
        }
        if self.acceleration.is_dirty() {
            let a = self.acceleration.target();
            if link.set_acceleration(a).is_ok() {
                self.acceleration.mark_applied(a);
            }
        }
    }

    /// Declare the current position as origin. Bypasses the detector.
    pub fn set_origin<D: MotorDriver>(&mut self, link: &mut MotorLink<D>) {
        debug!("manual set_origin");
        let _ = link.set_origin();
        self.position.reset(0.0);
    }

    /// Move to the origin now. Bypasses the detector.
    pub fn go_to_origin<D: MotorDriver>(&mut self, link: &mut MotorLink<D>) {
        debug!("manual go to origin");
        let _ = link.go_absolute_position(0.0);
        self.position.reset(0.0);
    }
}

/// Velocity-mode targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocitySetpoints {
    pub velocity: Setpoint,
    pub acceleration: Setpoint,
}

impl VelocitySetpoints {
    /// At rest with the controller's default acceleration.
    pub fn new(defaults: &MotionDefaults) -> Self {
        Self {
            velocity: Setpoint::new(0.0),
            acceleration: Setpoint::new(defaults.default_acceleration),
        }
    }

    /// Dispatch changed quantities. A velocity change is engaged with `go`
    /// and only counts as applied once both commands went through.
    pub fn flush<D: MotorDriver>(&mut self, link: &mut MotorLink<D>) {
        if self.velocity.is_dirty() {
            let v = self.velocity.target();
            if link.set_velocity(v).and_then(|()| link.go()).is_ok() {
                self.velocity.mark_applied(v);
            }
        }
        if self.acceleration.is_dirty() {
            let a = self.acceleration.target();
            if link.set_acceleration(a).is_ok() {
                self.acceleration.mark_applied(a);
            }
        }
    }

    /// Stop now and zero the velocity target. Bypasses the detector.
    pub fn stop<D: MotorDriver>(&mut self, link: &mut MotorLink<D>) {
        debug!("manual stop");
        let _ = link.stop();
        self.velocity.reset(0.0);
    }
}

/// Targets of both modes. Only the active mode's half is ever flushed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Setpoints {
    pub position: PositionSetpoints,
    pub velocity: VelocitySetpoints,
}

impl Setpoints {
    /// Seed from the startup position readback and the controller defaults.
    pub fn seeded(position: f64, defaults: &MotionDefaults) -> Self {
        Self {
            position: PositionSetpoints::new(position, defaults),
            velocity: VelocitySetpoints::new(defaults),
        }
    }
}
