// src/exec/mod.rs

//! Process supervision.
//!
//! This is the core of logrun: the child is started with its stdout and
//! stderr on pipes, both pipes are drained to the terminal and the
//! transcript, heartbeat blocks are injected on a timer, and finally the
//! child's exit disposition is collected.
//!
//! - [`launcher`] starts the child in direct or shell mode.
//! - [`channel`] holds one pipe read end and its destination route.
//! - [`multiplexer`] is the single-task event loop over both channels.
//! - [`heartbeat`] schedules periodic status blocks.
//! - [`reaper`] waits for (or polls) the child's exit.
//! - [`disposition`] classifies the exit and maps it to logrun's own status.

pub mod channel;
pub mod disposition;
pub mod heartbeat;
pub mod launcher;
pub mod multiplexer;
pub mod reaper;

pub use channel::StreamChannel;
pub use disposition::{ExitDisposition, signal_name};
pub use heartbeat::{Heartbeat, HeartbeatPoll, Stopwatch};
pub use launcher::{ChildProcess, ExecFailure, Launch, Launched, launch};
pub use multiplexer::{MultiplexSummary, Multiplexer};
pub use reaper::{ReapStrategy, reap};
