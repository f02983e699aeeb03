//! Telemetry ring buffers and the phase-gated sampler.
//!
//! Buffers exist for plotting only. The one value that feeds back into
//! control is the last sampled position, used by the Position-mode entry reset.

use heapless::HistoryBuf as HistoryBuffer;
use smc_common::consts::TELEMETRY_CAPACITY;
use smc_common::driver::{MotorDriver, Quantity};
use tracing::{trace, warn};

use crate::link::MotorLink;
use crate::tick::TickScheduler;

/// Fixed-capacity FIFO of plot samples.
///
/// Backed by [`HistoryBuffer`]: pushing into a full buffer overwrites the
/// oldest sample. O(1) per push, no allocation.
#[derive(Debug, Clone)]
pub struct RingBuffer<T, const N: usize> {
    samples: HistoryBuffer<T, N>,
}

impl<T: Copy, const N: usize> RingBuffer<T, N> {
    pub fn new() -> Self {
        Self {
            samples: HistoryBuffer::new(),
        }
    }

    /// Append `value`, returning the evicted oldest sample when full.
    pub fn push(&mut self, value: T) -> Option<T> {
        let evicted = if self.samples.is_full() {
            self.samples.oldest_ordered().next().copied()
        } else {
            None
        };
        self.samples.write(value);
        evicted
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Most recent sample.
    pub fn latest(&self) -> Option<T> {
        self.samples.recent().copied()
    }

    /// Samples from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.samples.oldest_ordered().copied()
    }

    /// Contents in sampling order as two contiguous slices, for plot widgets
    /// that take a raw slice plus an offset.
    pub fn as_slices(&self) -> (&[T], &[T]) {
        self.samples.as_slices()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }
}

impl<T: Copy, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Plot buffer of one telemetry channel.
pub type Telemetry = RingBuffer<f64, TELEMETRY_CAPACITY>;

/// Reads actual position and velocity on their tick phases.
#[derive(Debug, Clone)]
pub struct TelemetrySampler {
    positions: Telemetry,
    velocities: Telemetry,
    position: f64,
    velocity: f64,
}

impl TelemetrySampler {
    /// Seed both channels with the startup readback.
    pub fn new(position: f64, velocity: f64) -> Self {
        let mut positions = Telemetry::new();
        let mut velocities = Telemetry::new();
        positions.push(position);
        velocities.push(velocity);
        Self {
            positions,
            velocities,
            position,
            velocity,
        }
    }

    /// Sample whichever channel the current phase is reserved for.
    ///
    /// A failed read leaves that channel and its last value untouched;
    /// the next eligible phase simply tries again.
    pub fn sample<D: MotorDriver>(&mut self, tick: &TickScheduler, link: &mut MotorLink<D>) {
        if tick.is_position_sample() {
            match link.read_position() {
                Ok(position) => {
                    self.position = position;
                    self.positions.push(position);
                    trace!("sampled position {position:.3}");
                }
                Err(e) => warn!("{} read failed at phase {}: {e}", Quantity::Position, tick.phase()),
            }
        }
        if tick.is_velocity_sample() {
            match link.read_velocity() {
                Ok(velocity) => {
                    self.velocity = velocity;
                    self.velocities.push(velocity);
                    trace!("sampled velocity {velocity:.3}");
                }
                Err(e) => warn!("{} read failed at phase {}: {e}", Quantity::Velocity, tick.phase()),
            }
        }
    }

    /// Last successfully sampled position.
    #[inline]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Last successfully sampled velocity.
    #[inline]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn positions(&self) -> &Telemetry {
        &self.positions
    }

    pub fn velocities(&self) -> &Telemetry {
        &self.velocities
    }
}
