// src/clock.rs

//! Wall-clock access behind a trait so heartbeat scheduling can be driven by
//! a fake clock in tests.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Local};

use crate::errors::{LogrunError, Result};

/// Wall-clock instant, in microseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const fn from_micros(micros: i64) -> Self {
        Timestamp(micros)
    }

    pub const fn as_micros(self) -> i64 {
        self.0
    }

    pub fn checked_add(self, d: Duration) -> Option<Self> {
        let micros = i64::try_from(d.as_micros()).ok()?;
        self.0.checked_add(micros).map(Timestamp)
    }

    /// Time from `earlier` to `self`, or zero if the clock went backwards.
    pub fn saturating_since(self, earlier: Timestamp) -> Duration {
        let delta = self.0.saturating_sub(earlier.0);
        Duration::from_micros(u64::try_from(delta).unwrap_or(0))
    }

    /// Local time in the `%c (%Z)` style used by the transcript.
    pub fn display_local(self) -> String {
        match DateTime::from_timestamp_micros(self.0) {
            Some(utc) => utc
                .with_timezone(&Local)
                .format("%c (%Z)")
                .to_string(),
            None => "??? unable to discover time ???".to_string(),
        }
    }
}

pub trait Clock {
    fn now(&self) -> Result<Timestamp>;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<Timestamp> {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| LogrunError::Clock(format!("system time before epoch: {e}")))?;
        let micros = i64::try_from(since_epoch.as_micros())
            .map_err(|_| LogrunError::Clock("system time out of range".to_string()))?;
        Ok(Timestamp(micros))
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Result<Timestamp> {
        (**self).now()
    }
}
