// src/exec/heartbeat.rs

//! Periodic status blocks and the elapsed-time baseline they report against.

use std::time::Duration;

use tracing::debug;

use crate::clock::{Clock, Timestamp};
use crate::errors::Result;
use crate::types::HeartbeatLevel;

/// Start time of the run, captured when the header's time line is written.
///
/// Held explicitly by whoever reports time rather than remembered by the
/// formatting code between calls.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    start: Timestamp,
}

impl Stopwatch {
    pub fn start_at(start: Timestamp) -> Self {
        Self { start }
    }

    pub fn start(clock: &impl Clock) -> Result<Self> {
        Ok(Self::start_at(clock.now()?))
    }

    pub fn started(&self) -> Timestamp {
        self.start
    }

    /// Never negative: a clock that went backwards reads as zero.
    pub fn elapsed(&self, now: Timestamp) -> Duration {
        now.saturating_since(self.start)
    }
}

/// What the multiplexer should do about the heartbeat this iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartbeatPoll {
    /// Emit a block now; the next one is a full interval away.
    Due,
    /// Nothing to emit; wake up again after at most this long.
    Wait(Duration),
}

/// Heartbeat schedule.
///
/// `last_fire` never moves backwards in logical time: if the clock is seen
/// to regress, the baseline is pulled back to the observed time instead of
/// producing a negative interval.
#[derive(Debug, Clone)]
pub struct Heartbeat {
    interval: Duration,
    last_fire: Timestamp,
    emitted: usize,
}

impl Heartbeat {
    /// `None` when the level is 0.
    pub fn new(level: HeartbeatLevel, now: Timestamp) -> Option<Self> {
        let interval = level.interval()?;
        Some(Self {
            interval,
            last_fire: now,
            emitted: 0,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of blocks emitted so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    pub fn poll(&mut self, now: Timestamp) -> HeartbeatPoll {
        if self.last_fire > now {
            debug!(
                behind_us = self.last_fire.as_micros() - now.as_micros(),
                "clock moved backwards; resetting heartbeat baseline"
            );
            self.last_fire = now;
        }

        let since = now.saturating_since(self.last_fire);
        match self.interval.checked_sub(since) {
            Some(remaining) if !remaining.is_zero() => HeartbeatPoll::Wait(remaining),
            _ => {
                self.last_fire = now;
                self.emitted += 1;
                HeartbeatPoll::Due
            }
        }
    }
}
