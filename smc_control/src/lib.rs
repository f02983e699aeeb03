//! # SMC Control Library
//!
//! Mediation layer between a blocking, low-rate motor driver and a
//! high-rate interactive console frame loop. Decides when hardware state
//! is polled, when a changed operator input becomes a hardware command,
//! and how mode transitions reset state before any command is issued.
//!
//! ## Per-frame flow
//!
//! 1. [`tick::TickScheduler`] advances one phase.
//! 2. [`telemetry::TelemetrySampler`] reads position (phase 0) or velocity (phase 5).
//! 3. [`state::mode::ModeStateMachine`] runs entry actions on a mode switch.
//! 4. Operator edits land in the active mode's [`setpoint::Setpoints`].
//! 5. On the flush phase the active mode's change detector dispatches
//!    through [`link::MotorLink`].
//!
//! All state is owned by [`cycle::FrameRunner`]; nothing is shared with
//! another thread.

pub mod bounds;
pub mod config;
pub mod console;
pub mod cycle;
pub mod error;
pub mod link;
pub mod setpoint;
pub mod state;
pub mod telemetry;
pub mod tick;
