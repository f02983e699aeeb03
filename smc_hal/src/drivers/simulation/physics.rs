//! Single-motor kinematics.
//!
//! Position moves follow a triangular/trapezoidal velocity profile bounded by
//! the profile velocity and acceleration. Velocity moves ramp toward the
//! commanded velocity once engaged. A stop decelerates to standstill.

use smc_common::driver::MotorLimits;
use smc_common::mode::DriveMode;
use tracing::trace;

/// Below this speed the motor is considered at standstill.
const STANDSTILL_VELOCITY: f64 = 1e-3;

/// What the simulated controller is currently executing.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Motion {
    Idle,
    /// Absolute move toward a target position.
    Positioning { target: f64 },
    /// Velocity ramp toward the engaged command.
    Running { command: f64 },
    /// Deceleration to standstill.
    Stopping,
}

/// Motor physics simulator.
#[derive(Debug, Clone)]
pub struct MotorSimulator {
    limits: MotorLimits,
    mode: DriveMode,
    position: f64,
    velocity: f64,
    profile_velocity: f64,
    profile_acceleration: f64,
    motion: Motion,
}

impl MotorSimulator {
    /// Create a simulator at the origin, at rest, in position mode.
    pub fn new(limits: MotorLimits, profile_velocity: f64, profile_acceleration: f64) -> Self {
        Self {
            limits,
            mode: DriveMode::Position,
            position: 0.0,
            velocity: 0.0,
            profile_velocity,
            profile_acceleration,
            motion: Motion::Idle,
        }
    }

    /// Actual position.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Actual velocity.
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Active controller mode.
    pub fn mode(&self) -> DriveMode {
        self.mode
    }

    /// `true` while the motor is moving or has a pending motion.
    pub fn is_moving(&self) -> bool {
        self.motion != Motion::Idle || self.velocity.abs() > STANDSTILL_VELOCITY
    }

    /// Switch controller mode. Any motion in progress is brought to a stop.
    pub fn set_mode(&mut self, mode: DriveMode) {
        self.mode = mode;
        self.stop();
    }

    /// Set the profile velocity. In velocity mode this is also the next command.
    pub fn set_velocity(&mut self, velocity: f64) {
        self.profile_velocity = velocity.clamp(-self.limits.v_limit, self.limits.v_limit);
    }

    /// Set the profile acceleration.
    pub fn set_acceleration(&mut self, acceleration: f64) {
        self.profile_acceleration = acceleration.abs().min(self.limits.a_limit);
    }

    /// Start an absolute move. Ignored outside position mode.
    pub fn go_absolute_position(&mut self, target: f64) {
        if self.mode != DriveMode::Position {
            return;
        }
        let target = target.clamp(-self.limits.pt_limit, self.limits.pt_limit);
        self.motion = Motion::Positioning { target };
    }

    /// Engage the commanded velocity. Ignored outside velocity mode.
    pub fn go(&mut self) {
        if self.mode != DriveMode::Velocity {
            return;
        }
        self.motion = Motion::Running {
            command: self.profile_velocity,
        };
    }

    /// Decelerate to standstill.
    pub fn stop(&mut self) {
        self.motion = Motion::Stopping;
    }

    /// Declare the current position as zero.
    pub fn set_origin(&mut self) {
        if let Motion::Positioning { target } = self.motion {
            self.motion = Motion::Positioning {
                target: target - self.position,
            };
        }
        self.position = 0.0;
    }

    /// Advance the simulation by `dt` seconds.
    pub fn step(&mut self, dt: f64) {
        if dt <= 0.0 {
            return;
        }
        match self.motion {
            Motion::Idle => {}
            Motion::Positioning { target } => self.step_positioning(target, dt),
            Motion::Running { command } => self.ramp_towards(command, dt),
            Motion::Stopping => {
                self.ramp_towards(0.0, dt);
                if self.velocity == 0.0 {
                    self.motion = Motion::Idle;
                }
            }
        }
        self.position = self
            .position
            .clamp(-self.limits.pt_limit, self.limits.pt_limit);

        trace!(
            "sim: pos={:.3}, vel={:.3}, motion={:?}",
            self.position, self.velocity, self.motion
        );
    }

    fn step_positioning(&mut self, target: f64, dt: f64) {
        let error = target - self.position;
        let max_vel = self.profile_velocity.abs();
        let max_acc = self.profile_acceleration;

        let desired = if max_acc > 0.0 {
            let stopping_distance = self.velocity * self.velocity / (2.0 * max_acc);
            if error.abs() <= stopping_distance {
                error.signum() * (2.0 * max_acc * error.abs()).sqrt().min(max_vel)
            } else {
                error.signum() * max_vel
            }
        } else {
            error.signum() * max_vel
        };

        self.ramp_towards(desired, dt);
        let next = self.position + self.velocity * dt;

        // Snap onto the target instead of oscillating around it.
        if (target - next).signum() != error.signum() || (target - next).abs() < STANDSTILL_VELOCITY {
            self.position = target;
            self.velocity = 0.0;
            self.motion = Motion::Idle;
        } else {
            self.position = next;
        }
    }

    /// Change velocity toward `desired`, bounded by the profile acceleration.
    /// A non-positive acceleration applies the change immediately.
    fn ramp_towards(&mut self, desired: f64, dt: f64) {
        let desired = desired.clamp(-self.limits.v_limit, self.limits.v_limit);
        let delta = desired - self.velocity;
        let max_delta = if self.profile_acceleration > 0.0 {
            self.profile_acceleration * dt
        } else {
            f64::INFINITY
        };
        self.velocity += delta.clamp(-max_delta, max_delta);
        if self.velocity.abs() < STANDSTILL_VELOCITY && desired == 0.0 {
            self.velocity = 0.0;
        }
        if !matches!(self.motion, Motion::Positioning { .. }) {
            self.position += self.velocity * dt;
        }
    }
}
