//! Headless console replaying a scripted operator session.
//!
//! # TOML Example
//!
//! ```toml
//! frames = 600
//!
//! [[step]]
//! frame = 3
//! action = "set_position"
//! value = 500.0
//!
//! [[step]]
//! frame = 120
//! action = "select_mode"
//! index = 1
//! ```

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

use super::{Console, FrameView, OperatorEvent};

/// An operator event scheduled for a frame (frames count from 1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub frame: u64,
    #[serde(flatten)]
    pub event: OperatorEvent,
}

/// A recorded operator session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperatorScript {
    /// Close after this many frames. `None` runs until interrupted.
    #[serde(default)]
    pub frames: Option<u64>,
    #[serde(default)]
    pub step: Vec<ScriptStep>,
}

pub struct ScriptedConsole {
    steps: VecDeque<ScriptStep>,
    frame: u64,
    frame_limit: Option<u64>,
    report_every: u64,
    shutdown: Arc<AtomicBool>,
}

impl ScriptedConsole {
    pub fn new(script: OperatorScript) -> Self {
        let mut steps = script.step;
        // Stable: same-frame events keep their script order.
        steps.sort_by_key(|s| s.frame);
        Self {
            steps: steps.into(),
            frame: 0,
            frame_limit: script.frames,
            report_every: 0,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Override the script's frame limit.
    pub fn with_frame_limit(mut self, frames: Option<u64>) -> Self {
        if frames.is_some() {
            self.frame_limit = frames;
        }
        self
    }

    /// Log a telemetry line every `frames` frames (0 disables).
    pub fn with_report_every(mut self, frames: u64) -> Self {
        self.report_every = frames;
        self
    }

    /// Flag that closes the console at the next frame boundary.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Frames begun so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Scripted events not replayed yet.
    pub fn pending(&self) -> usize {
        self.steps.len()
    }
}

impl Console for ScriptedConsole {
    fn should_close(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
            || self.frame_limit.is_some_and(|limit| self.frame >= limit)
    }

    fn new_frame(&mut self) {
        self.frame += 1;
    }

    fn poll_events(&mut self) -> Vec<OperatorEvent> {
        // Steps scheduled for frames already past are replayed late rather than lost.
        let mut events = Vec::new();
        while let Some(step) = self.steps.front() {
            if step.frame > self.frame {
                break;
            }
            if let Some(step) = self.steps.pop_front() {
                debug!("frame {}: operator {:?}", self.frame, step.event);
                events.push(step.event);
            }
        }
        events
    }

    fn render(&mut self, view: &FrameView<'_>) {
        if self.report_every == 0 || view.frame % self.report_every != 0 {
            return;
        }
        let sp = view.setpoints;
        let (target_v, target_a) = match view.mode {
            smc_common::mode::OperatingMode::Velocity => {
                (sp.velocity.velocity.target(), sp.velocity.acceleration.target())
            }
            _ => (sp.position.velocity.target(), sp.position.acceleration.target()),
        };
        info!(
            "frame {} [{}] position={:.1} velocity={:.1} target_pt={:.1} target_v={:.1} target_a={:.1}",
            view.frame,
            view.mode,
            view.position,
            view.velocity,
            sp.position.position.target(),
            target_v,
            target_a,
        );
    }
}
