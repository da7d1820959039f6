use std::cell::Cell;
use std::time::Duration;

use logrun::clock::{Clock, Timestamp};
use logrun::errors::Result;

/// 2024-01-01T00:00:00Z, a convenient fixed starting point.
pub const EPOCH_2024: Timestamp = Timestamp::from_micros(1_704_067_200_000_000);

/// A clock that only moves when told to, in either direction.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<i64>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Cell::new(start.as_micros()),
        }
    }

    pub fn advance(&self, d: Duration) {
        self.now.set(self.now.get() + d.as_micros() as i64);
    }

    pub fn rewind(&self, d: Duration) {
        self.now.set(self.now.get() - d.as_micros() as i64);
    }

    pub fn set(&self, t: Timestamp) {
        self.now.set(t.as_micros());
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Result<Timestamp> {
        Ok(Timestamp::from_micros(self.now.get()))
    }
}

/// Wall clock that follows Tokio's (possibly paused) time, for tests that
/// run with `start_paused = true`.
#[derive(Debug, Clone, Copy)]
pub struct PausedClock {
    base: Timestamp,
    origin: tokio::time::Instant,
}

impl PausedClock {
    pub fn new(base: Timestamp) -> Self {
        Self {
            base,
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Clock for PausedClock {
    fn now(&self) -> Result<Timestamp> {
        let elapsed = self.origin.elapsed();
        Ok(self
            .base
            .checked_add(elapsed)
            .unwrap_or(self.base))
    }
}
