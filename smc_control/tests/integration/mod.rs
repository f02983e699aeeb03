//! Shared fixtures for the frame-loop integration tests.

mod dispatch;
mod modes;
mod scripted_session;

use smc_common::driver::{DriverError, MotionDefaults, MotorDriver, MotorLimits};
use smc_common::mode::DriveMode;
use smc_control::bounds::SoftBounds;
use smc_control::console::OperatorEvent;
use smc_control::cycle::FrameRunner;
use smc_control::link::MotorLink;

/// A command that reached the driver.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Mode(DriveMode),
    Velocity(f64),
    Acceleration(f64),
    Position(f64),
    Go,
    Stop,
    Origin,
}

/// Driver that records commands and serves scripted readbacks.
pub struct Recorder {
    pub calls: Vec<Call>,
    pub position: f64,
    pub velocity: f64,
    /// Added to `position` after every successful position read.
    pub position_step: f64,
    pub fail_reads: bool,
    /// Commands are recorded as attempted, then fail.
    pub fail_writes: bool,
    /// Only `go` fails.
    pub fail_go: bool,
    pub limits: MotorLimits,
    pub defaults: MotionDefaults,
}

impl Recorder {
    pub fn at(position: f64) -> Self {
        Self {
            calls: Vec::new(),
            position,
            velocity: 0.0,
            position_step: 0.0,
            fail_reads: false,
            fail_writes: false,
            fail_go: false,
            limits: MotorLimits::default(),
            defaults: MotionDefaults {
                default_velocity: 10.0,
                default_acceleration: 10.0,
            },
        }
    }
}

impl Recorder {
    fn record(&mut self, call: Call) -> Result<(), DriverError> {
        let fails = self.fail_writes || (self.fail_go && call == Call::Go);
        self.calls.push(call);
        if fails {
            Err(DriverError::Communication("nak".to_string()))
        } else {
            Ok(())
        }
    }
}

impl MotorDriver for Recorder {
    fn name(&self) -> &'static str {
        "recorder"
    }
    fn limits(&self) -> MotorLimits {
        self.limits
    }
    fn defaults(&self) -> MotionDefaults {
        self.defaults
    }
    fn position(&mut self) -> Result<f64, DriverError> {
        if self.fail_reads {
            return Err(DriverError::Communication("timeout".to_string()));
        }
        let p = self.position;
        self.position += self.position_step;
        Ok(p)
    }
    fn velocity(&mut self) -> Result<f64, DriverError> {
        if self.fail_reads {
            return Err(DriverError::Communication("timeout".to_string()));
        }
        Ok(self.velocity)
    }
    fn set_mode(&mut self, mode: DriveMode) -> Result<(), DriverError> {
        self.record(Call::Mode(mode))
    }
    fn set_velocity(&mut self, v: f64) -> Result<(), DriverError> {
        self.record(Call::Velocity(v))
    }
    fn set_acceleration(&mut self, a: f64) -> Result<(), DriverError> {
        self.record(Call::Acceleration(a))
    }
    fn go_absolute_position(&mut self, p: f64) -> Result<(), DriverError> {
        self.record(Call::Position(p))
    }
    fn go(&mut self) -> Result<(), DriverError> {
        self.record(Call::Go)
    }
    fn stop(&mut self) -> Result<(), DriverError> {
        self.record(Call::Stop)
    }
    fn set_origin(&mut self) -> Result<(), DriverError> {
        self.record(Call::Origin)
    }
}

pub fn runner(driver: Recorder) -> FrameRunner<Recorder> {
    FrameRunner::start(MotorLink::new(driver), SoftBounds::default()).unwrap()
}

/// Run one frame and return the commands it issued.
pub fn frame(runner: &mut FrameRunner<Recorder>, events: &[OperatorEvent]) -> Vec<Call> {
    runner.step(events);
    std::mem::take(&mut runner.link_mut().driver_mut().calls)
}

/// Run empty frames until the frame counter reaches `last`, collecting commands.
pub fn idle_until(runner: &mut FrameRunner<Recorder>, last: u64) -> Vec<Call> {
    let mut calls = Vec::new();
    while runner.state().frame < last {
        calls.extend(frame(runner, &[]));
    }
    calls
}
