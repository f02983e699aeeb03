//! Operating mode state machine.
//!
//! The operator's selector records a selection; the machine compares it to
//! the active mode once per frame and, on a difference, runs the entry
//! actions of the mode being entered. There are no exit actions. Entry
//! commands are fire-and-forget and each is attempted even if an earlier
//! one in the same sequence failed.

use smc_common::driver::MotorDriver;
use smc_common::mode::OperatingMode;
use tracing::info;

use crate::link::MotorLink;
use crate::setpoint::{PositionSetpoints, Setpoints, VelocitySetpoints};

/// A completed mode switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTransition {
    pub from: OperatingMode,
    pub to: OperatingMode,
}

#[derive(Debug, Clone)]
pub struct ModeStateMachine {
    active: OperatingMode,
    selected: OperatingMode,
}

impl ModeStateMachine {
    /// Start in `initial` without running its entry actions.
    pub const fn new(initial: OperatingMode) -> Self {
        Self {
            active: initial,
            selected: initial,
        }
    }

    #[inline]
    pub const fn active(&self) -> OperatingMode {
        self.active
    }

    #[inline]
    pub const fn selected(&self) -> OperatingMode {
        self.selected
    }

    /// Record the operator's selection. The last selection before
    /// [`Self::sync`] wins.
    pub fn select(&mut self, mode: OperatingMode) {
        self.selected = mode;
    }

    /// Enter the selected mode if it differs from the active one.
    ///
    /// `sampled_position` is the most recent actual position; Position entry
    /// retargets to it so the actuator never snaps back to a stale target.
    pub fn sync<D: MotorDriver>(
        &mut self,
        link: &mut MotorLink<D>,
        setpoints: &mut Setpoints,
        sampled_position: f64,
    ) -> Option<ModeTransition> {
        if self.selected == self.active {
            return None;
        }
        let transition = ModeTransition {
            from: self.active,
            to: self.selected,
        };
        info!("Mode switch: {} -> {}", transition.from, transition.to);

        if let Some(drive) = transition.to.drive_mode() {
            let _ = link.set_mode(drive);
        }
        match transition.to {
            OperatingMode::Position => {
                enter_position(link, &mut setpoints.position, sampled_position)
            }
            OperatingMode::Velocity => enter_velocity(link, &mut setpoints.velocity),
            OperatingMode::System => {}
        }
        self.active = transition.to;
        Some(transition)
    }
}

/// After the mode switch: re-send the profile, stop, and retarget to where
/// the motor actually is.
fn enter_position<D: MotorDriver>(
    link: &mut MotorLink<D>,
    sp: &mut PositionSetpoints,
    sampled_position: f64,
) {
    let v = sp.velocity.target();
    if link.set_velocity(v).is_ok() {
        sp.velocity.mark_applied(v);
    }
    let a = sp.acceleration.target();
    if link.set_acceleration(a).is_ok() {
        sp.acceleration.mark_applied(a);
    }
    let _ = link.stop();

    sp.position.set_target(sampled_position);
}

/// After the mode switch: zero the velocity command before anything else
/// can be engaged.
fn enter_velocity<D: MotorDriver>(link: &mut MotorLink<D>, sp: &mut VelocitySetpoints) {
    sp.velocity.set_target(0.0);
    if link.set_velocity(0.0).is_ok() {
        sp.velocity.mark_applied(0.0);
    }
    let a = sp.acceleration.target();
    if link.set_acceleration(a).is_ok() {
        sp.acceleration.mark_applied(a);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
