//! Frame tick scheduler.
//!
//! A counter cycling `0..TICK_PERIOD`, advanced once per frame before any
//! other work. Hardware reads are staggered over distinct phases so two
//! blocking calls never land in the same frame; writes are concentrated
//! on the flush phase so each quantity is commanded at most once per period.

use smc_common::consts::{FLUSH_PHASE, POSITION_SAMPLE_PHASE, TICK_PERIOD, VELOCITY_SAMPLE_PHASE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickScheduler {
    phase: u32,
}

impl TickScheduler {
    /// Scheduler at phase 0; the first frame runs at phase 1.
    pub const fn new() -> Self {
        Self { phase: 0 }
    }

    /// Advance one frame and return the new phase.
    #[inline]
    pub fn advance(&mut self) -> u32 {
        self.phase = (self.phase + 1) % TICK_PERIOD;
        self.phase
    }

    #[inline]
    pub const fn phase(&self) -> u32 {
        self.phase
    }

    #[inline]
    pub const fn is_position_sample(&self) -> bool {
        self.phase == POSITION_SAMPLE_PHASE
    }

    #[inline]
    pub const fn is_velocity_sample(&self) -> bool {
        self.phase == VELOCITY_SAMPLE_PHASE
    }

    #[inline]
    pub const fn is_flush(&self) -> bool {
        self.phase == FLUSH_PHASE
    }
}
