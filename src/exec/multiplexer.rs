// src/exec/multiplexer.rs

//! The event loop that drains both child pipes.
//!
//! Each iteration:
//! 1. flushes the transcript file, so a crash loses at most one cycle;
//! 2. checks the heartbeat deadline, emitting a block if it is due;
//! 3. waits until either channel is readable or the next heartbeat is due.
//!
//! Everything runs on the current task; the only suspension point is the
//! `select!` wait. Without heartbeats the wait has no timeout.

use std::io::{self, Write};
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::clock::{Clock, Timestamp};
use crate::errors::{LogrunError, Result};
use crate::exec::channel::StreamChannel;
use crate::exec::heartbeat::{Heartbeat, HeartbeatPoll, Stopwatch};
use crate::sink::Tee;
use crate::transcript;
use crate::usage;

/// Pause before retrying a read that failed.
pub const READ_RETRY_DELAY: Duration = Duration::from_millis(250);

/// Consecutive non-transient read failures tolerated on one channel.
pub const MAX_READ_FAILURES: u32 = 8;

/// What was copied while multiplexing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MultiplexSummary {
    pub stdout_bytes: u64,
    pub stderr_bytes: u64,
    pub heartbeats: usize,
}

enum Event {
    Read(usize, io::Result<usize>),
    Tick,
    Drained,
}

pub struct Multiplexer<C: Clock> {
    clock: C,
    stopwatch: Stopwatch,
    heartbeat: Option<Heartbeat>,
    /// Terminal stderr + log; heartbeats and read diagnostics go here.
    status: Tee,
    child_pid: Option<u32>,
}

impl<C: Clock> Multiplexer<C> {
    pub fn new(clock: C, stopwatch: Stopwatch, heartbeat: Option<Heartbeat>, status: Tee) -> Self {
        Self {
            clock,
            stopwatch,
            heartbeat,
            status,
            child_pid: None,
        }
    }

    /// Sample this process's CPU time for heartbeat blocks.
    pub fn with_child_pid(mut self, pid: u32) -> Self {
        self.child_pid = Some(pid);
        self
    }

    /// Drain both channels until each has reached end-of-stream.
    ///
    /// `channels` is `[stdout, stderr]`; bytes within a channel keep their
    /// order, bytes across channels are copied in readiness order.
    pub async fn run(&mut self, mut channels: [StreamChannel; 2]) -> Result<MultiplexSummary> {
        while channels.iter().any(StreamChannel::is_open) {
            self.status.flush().map_err(LogrunError::log_write)?;

            let wait = self.service_heartbeat()?;

            let [first, second] = &mut channels;
            let event = tokio::select! {
                res = first.fill(), if first.is_open() => Event::Read(0, res),
                res = second.fill(), if second.is_open() => Event::Read(1, res),
                () = sleep(wait.unwrap_or_default()), if wait.is_some() => Event::Tick,
                else => Event::Drained,
            };

            match event {
                Event::Read(idx, res) => self.handle_read(&mut channels[idx], res).await?,
                Event::Tick => {}
                Event::Drained => break,
            }
        }

        self.status.flush().map_err(LogrunError::log_write)?;

        let [stdout, stderr] = &channels;
        let summary = MultiplexSummary {
            stdout_bytes: stdout.forwarded(),
            stderr_bytes: stderr.forwarded(),
            heartbeats: self.heartbeat.as_ref().map_or(0, Heartbeat::emitted),
        };
        debug!(?summary, "all child output drained");
        Ok(summary)
    }

    /// Emit a heartbeat if one is due and return how long the next wait may
    /// last, or `None` when heartbeats are off.
    fn service_heartbeat(&mut self) -> Result<Option<Duration>> {
        let Some(heartbeat) = self.heartbeat.as_mut() else {
            return Ok(None);
        };
        let now = self.clock.now()?;
        let poll = heartbeat.poll(now);
        let interval = heartbeat.interval();

        match poll {
            HeartbeatPoll::Wait(remaining) => Ok(Some(remaining)),
            HeartbeatPoll::Due => {
                self.emit_heartbeat(now)?;
                Ok(Some(interval))
            }
        }
    }

    fn emit_heartbeat(&mut self, now: Timestamp) -> Result<()> {
        let cpu = self.child_pid.and_then(usage::process_usage);
        let block = transcript::heartbeat(now, self.stopwatch.elapsed(now), cpu.as_ref());
        self.status
            .write_all(block.as_bytes())
            .map_err(LogrunError::log_write)
    }

    async fn handle_read(
        &mut self,
        channel: &mut StreamChannel,
        res: io::Result<usize>,
    ) -> Result<()> {
        match res {
            Ok(0) => channel.close(),
            Ok(n) => channel.forward(n)?,
            Err(e) if is_transient(&e) => {
                debug!(stream = %channel.stream(), error = %e, "transient read error; retrying");
                sleep(READ_RETRY_DELAY).await;
            }
            Err(e) => {
                let failures = channel.record_failure();
                warn!(stream = %channel.stream(), error = %e, failures, "read from child failed");
                let note = format!("read failed: {e}{}", transcript::HEARTBEAT_EOL);
                self.status
                    .write_all(note.as_bytes())
                    .map_err(LogrunError::log_write)?;
                if failures >= MAX_READ_FAILURES {
                    return Err(LogrunError::Read {
                        stream: channel.stream().as_str(),
                        source: e,
                    });
                }
                sleep(READ_RETRY_DELAY).await;
            }
        }
        Ok(())
    }
}

fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock
    )
}
