//! Frame loop: tick → sample → mode entry → operator edits → flush → render.
//!
//! `FrameRunner` owns the driver link and all control state. [`FrameRunner::step`]
//! executes one frame against a batch of operator events and can be driven
//! by tests without a console; [`FrameRunner::run`] paces frames for a real
//! [`Console`] until it asks to close.
//!
//! Hardware calls block the frame. A slow link therefore shows up as slow
//! frames, which are counted in [`FrameStats`] but never abort the loop.

use smc_common::driver::{MotorDriver, Quantity};
use smc_common::mode::OperatingMode;
use smc_common::prelude::frame_budget;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::bounds::SoftBounds;
use crate::config::StartupConfig;
use crate::console::{Console, FrameView, OperatorEvent};
use crate::error::StartupError;
use crate::link::MotorLink;
use crate::setpoint::Setpoints;
use crate::state::mode::{ModeStateMachine, ModeTransition};
use crate::telemetry::TelemetrySampler;
use crate::tick::TickScheduler;

// ─── Frame Statistics ───────────────────────────────────────────────

/// O(1) per-frame timing statistics.
#[derive(Debug, Clone)]
pub struct FrameStats {
    /// Total frames executed.
    pub frame_count: u64,
    /// Last frame duration [ns].
    pub last_frame_ns: u64,
    /// Minimum frame duration [ns].
    pub min_frame_ns: u64,
    /// Maximum frame duration [ns].
    pub max_frame_ns: u64,
    /// Running sum for average computation.
    pub sum_frame_ns: u64,
    /// Frames that exceeded the frame budget.
    pub slow_frames: u64,
}

impl FrameStats {
    pub const fn new() -> Self {
        Self {
            frame_count: 0,
            last_frame_ns: 0,
            min_frame_ns: u64::MAX,
            max_frame_ns: 0,
            sum_frame_ns: 0,
            slow_frames: 0,
        }
    }

    /// Record a frame duration against `budget`. A zero budget never counts as slow.
    #[inline]
    pub fn record(&mut self, duration: Duration, budget: Duration) {
        let ns = duration.as_nanos().min(u64::MAX as u128) as u64;
        self.frame_count += 1;
        self.last_frame_ns = ns;
        self.min_frame_ns = self.min_frame_ns.min(ns);
        self.max_frame_ns = self.max_frame_ns.max(ns);
        self.sum_frame_ns = self.sum_frame_ns.saturating_add(ns);
        if !budget.is_zero() && duration > budget {
            self.slow_frames += 1;
        }
    }

    /// Average frame time [ns] (0 if no frames).
    #[inline]
    pub fn avg_frame_ns(&self) -> u64 {
        if self.frame_count == 0 {
            0
        } else {
            self.sum_frame_ns / self.frame_count
        }
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Control State ─────────────────────────────────────────────────

/// All mutable state of the mediation layer, owned by the runner.
#[derive(Debug, Clone)]
pub struct ControlState {
    pub frame: u64,
    pub tick: TickScheduler,
    pub mode: ModeStateMachine,
    pub telemetry: TelemetrySampler,
    pub bounds: SoftBounds,
    pub setpoints: Setpoints,
}

/// What happened in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub frame: u64,
    pub phase: u32,
    pub transition: Option<ModeTransition>,
    pub flushed: bool,
}

// ─── Startup ───────────────────────────────────────────────────────

/// Out-and-back move before the loop starts. Failures are logged only.
pub fn startup_exercise<D: MotorDriver>(link: &mut MotorLink<D>, config: &StartupConfig) {
    if !config.exercise {
        return;
    }
    info!(
        "Startup exercise: travel to {} and back (settle {:?})",
        config.travel,
        config.settle()
    );
    for target in [config.travel, 0.0] {
        if link.go_absolute_position(target).is_ok() {
            std::thread::sleep(config.settle());
        }
    }
}

// ─── Frame Runner ──────────────────────────────────────────────────

pub struct FrameRunner<D> {
    link: MotorLink<D>,
    state: ControlState,
    stats: FrameStats,
    frame_budget: Duration,
}

impl<D: MotorDriver> FrameRunner<D> {
    /// Read back the actuator state and seed setpoints, bounds and telemetry.
    ///
    /// Starts in Position mode without running its entry actions.
    ///
    /// # Errors
    /// `StartupError::Readback` if the initial position or velocity read fails.
    pub fn start(mut link: MotorLink<D>, bounds: SoftBounds) -> Result<Self, StartupError> {
        let position = link
            .read_position()
            .map_err(|source| StartupError::Readback {
                quantity: Quantity::Position,
                source,
            })?;
        let velocity = link
            .read_velocity()
            .map_err(|source| StartupError::Readback {
                quantity: Quantity::Velocity,
                source,
            })?;
        let defaults = link.driver().defaults();
        let bounds = bounds.clamped(link.limits());

        info!(
            "Seeded at position={position:.3}, velocity={velocity:.3}, default v={}, a={}",
            defaults.default_velocity, defaults.default_acceleration
        );

        let state = ControlState {
            frame: 0,
            tick: TickScheduler::new(),
            mode: ModeStateMachine::new(OperatingMode::Position),
            telemetry: TelemetrySampler::new(position, velocity),
            bounds,
            setpoints: Setpoints::seeded(position, &defaults),
        };

        Ok(Self {
            link,
            state,
            stats: FrameStats::new(),
            frame_budget: Duration::ZERO,
        })
    }

    /// Pace [`Self::run`] at `rate_hz` (0 = unpaced).
    pub fn with_frame_rate(mut self, rate_hz: u32) -> Self {
        self.frame_budget = frame_budget(rate_hz);
        self
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    pub fn link(&self) -> &MotorLink<D> {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut MotorLink<D> {
        &mut self.link
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Execute one frame against the operator events captured during it.
    pub fn step(&mut self, events: &[OperatorEvent]) -> FrameReport {
        let s = &mut self.state;
        s.frame += 1;
        let phase = s.tick.advance();

        for event in events {
            if let OperatorEvent::SelectMode { index } = *event {
                match OperatingMode::from_index(index) {
                    Some(mode) => s.mode.select(mode),
                    None => warn!("Ignoring selector index {index}"),
                }
            }
        }

        s.telemetry.sample(&s.tick, &mut self.link);

        let transition = s
            .mode
            .sync(&mut self.link, &mut s.setpoints, s.telemetry.position());

        for event in events {
            self.apply(event);
        }

        let s = &mut self.state;
        let flushed = s.tick.is_flush();
        if flushed {
            match s.mode.active() {
                OperatingMode::Position => s.setpoints.position.flush(&mut self.link),
                OperatingMode::Velocity => s.setpoints.velocity.flush(&mut self.link),
                OperatingMode::System => {}
            }
        }

        FrameReport {
            frame: s.frame,
            phase,
            transition,
            flushed,
        }
    }

    /// Read-only snapshot for rendering.
    pub fn view(&self) -> FrameView<'_> {
        let s = &self.state;
        FrameView {
            frame: s.frame,
            phase: s.tick.phase(),
            mode: s.mode.active(),
            position: s.telemetry.position(),
            velocity: s.telemetry.velocity(),
            positions: s.telemetry.positions(),
            velocities: s.telemetry.velocities(),
            bounds: &s.bounds,
            setpoints: &s.setpoints,
        }
    }

    /// Run frames until the console asks to close.
    pub fn run<C: Console>(&mut self, console: &mut C) {
        info!("Entering frame loop (budget {:?})", self.frame_budget);
        while !console.should_close() {
            let frame_start = Instant::now();

            console.new_frame();
            let events = console.poll_events();
            self.step(&events);
            console.render(&self.view());

            let elapsed = frame_start.elapsed();
            self.stats.record(elapsed, self.frame_budget);
            if !self.frame_budget.is_zero() && elapsed > self.frame_budget {
                debug!(
                    "frame {} took {:?} (budget {:?})",
                    self.state.frame, elapsed, self.frame_budget
                );
            }

            if let Some(remaining) = self.frame_budget.checked_sub(elapsed) {
                std::thread::sleep(remaining);
            }
        }

        let link = self.link.stats();
        info!(
            "Frame loop closed after {} frames: avg {}µs, max {}µs, {} slow; \
             {} commands sent, {} rejected, {} failed, {} read failures",
            self.stats.frame_count,
            self.stats.avg_frame_ns() / 1000,
            self.stats.max_frame_ns / 1000,
            self.stats.slow_frames,
            link.commands_sent,
            link.commands_rejected,
            link.commands_failed,
            link.read_failures,
        );
    }

    /// Apply a widget interaction to the active mode's panel.
    ///
    /// Widgets exist only on their own panel; events for widgets the active
    /// panel does not show are ignored. Setpoint edits are clamped into the
    /// current soft bounds the way the sliders clamp.
    fn apply(&mut self, event: &OperatorEvent) {
        let s = &mut self.state;
        let mode = s.mode.active();
        let limits = *self.link.limits();
        let b = &mut s.bounds;
        let sp = &mut s.setpoints;

        match (mode, *event) {
            (_, OperatorEvent::SelectMode { .. }) => {}

            (OperatingMode::Position, OperatorEvent::SetPosition { value }) => {
                sp.position.position.set_target(b.position_input().clamp(value));
            }
            (OperatingMode::Position, OperatorEvent::SetVelocity { value }) => {
                sp.position.velocity.set_target(b.velocity_input(mode).clamp(value));
            }
            (OperatingMode::Position, OperatorEvent::SetAcceleration { value }) => {
                sp.position.acceleration.set_target(b.acceleration_input().clamp(value));
            }
            (OperatingMode::Velocity, OperatorEvent::SetVelocity { value }) => {
                sp.velocity.velocity.set_target(b.velocity_input(mode).clamp(value));
            }
            (OperatingMode::Velocity, OperatorEvent::SetAcceleration { value }) => {
                sp.velocity.acceleration.set_target(b.acceleration_input().clamp(value));
            }

            (OperatingMode::Position, OperatorEvent::SetPositionExtent { value }) => {
                b.set_position_extent(value, &limits);
            }
            (OperatingMode::Position, OperatorEvent::SetVelocityRange { min, max }) => {
                b.set_velocity_range(min, max, &limits);
            }
            (
                OperatingMode::Position | OperatingMode::Velocity,
                OperatorEvent::SetAccelerationRange { min, max },
            ) => {
                b.set_acceleration_range(min, max, &limits);
            }
            (OperatingMode::Velocity, OperatorEvent::SetVelocityExtent { value }) => {
                b.set_velocity_extent(value, &limits);
            }

            (OperatingMode::Position, OperatorEvent::SetOrigin) => {
                sp.position.set_origin(&mut self.link);
            }
            (OperatingMode::Position, OperatorEvent::GoToOrigin) => {
                sp.position.go_to_origin(&mut self.link);
            }
            (OperatingMode::Velocity, OperatorEvent::Stop) => {
                sp.velocity.stop(&mut self.link);
            }

            (mode, event) => debug!("{event:?} has no widget in {mode}"),
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
