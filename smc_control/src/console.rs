//! Interface collaborator seam.
//!
//! The console owns rendering and the event pump. The control layer only
//! sees it through [`Console`]: a frame lifecycle, operator events passed in
//! as messages, and an immutable [`FrameView`] passed out for drawing.
//! Widget-level representations (such as the selector's integer index) stay
//! in [`OperatorEvent`] and are translated by the frame runner.

pub mod scripted;

use serde::{Deserialize, Serialize};
use smc_common::mode::OperatingMode;

use crate::bounds::{BoundRange, SoftBounds};
use crate::setpoint::Setpoints;
use crate::telemetry::Telemetry;

/// One operator interaction captured during a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OperatorEvent {
    /// Mode selector moved to the radio button at `index`.
    SelectMode { index: u8 },
    /// "Absolute position" slider (Position panel).
    SetPosition { value: f64 },
    /// "Velocity" slider of the active panel.
    SetVelocity { value: f64 },
    /// "Acceleration" slider of the active panel.
    SetAcceleration { value: f64 },
    /// "Position Range" drag (Position panel).
    SetPositionExtent { value: f64 },
    /// "Velocity Range" drag pair (Position panel).
    SetVelocityRange { min: f64, max: f64 },
    /// "Acceleration Range" drag pair (both panels).
    SetAccelerationRange { min: f64, max: f64 },
    /// "Velocity Range" drag (Velocity panel).
    SetVelocityExtent { value: f64 },
    /// "Stop" button (Velocity panel).
    Stop,
    /// "Set Origin" button (Position panel).
    SetOrigin,
    /// "To Origin" button (Position panel).
    GoToOrigin,
}

/// Everything a renderer needs for one frame. Borrowed, read-only.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub frame: u64,
    pub phase: u32,
    pub mode: OperatingMode,
    /// Last sampled actual position.
    pub position: f64,
    /// Last sampled actual velocity.
    pub velocity: f64,
    pub positions: &'a Telemetry,
    pub velocities: &'a Telemetry,
    pub bounds: &'a SoftBounds,
    pub setpoints: &'a Setpoints,
}

impl FrameView<'_> {
    /// Selector index of the active mode.
    pub fn selector_index(&self) -> u8 {
        self.mode.index()
    }

    /// Vertical plot ranges: position (`None` = auto-scale) and velocity.
    pub fn plot_ranges(&self) -> (Option<BoundRange>, BoundRange) {
        (
            self.bounds.position_plot(self.mode),
            self.bounds.velocity_plot(self.mode),
        )
    }
}

/// Frame lifecycle and widgets of the interactive console.
pub trait Console {
    /// Close requested. Checked once per frame before any work.
    fn should_close(&self) -> bool;

    /// Begin a frame.
    fn new_frame(&mut self);

    /// Operator interactions of the current frame, in the order they happened.
    fn poll_events(&mut self) -> Vec<OperatorEvent>;

    /// Draw the frame.
    fn render(&mut self, view: &FrameView<'_>);
}
