// src/types.rs

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::errors::{LogrunError, Result};

/// Longest shell command line accepted; the kernel's per-argument limit on
/// Linux (`MAX_ARG_STRLEN`).
pub const MAX_SHELL_COMMAND_LEN: usize = 128 * 1024;

/// How the command descriptor is turned into a process.
///
/// - `Shell`: the space-joined arguments are handed to the interpreter with
///   `-c`; quoting, globbing and pipes are its business.
/// - `Direct`: the first token is looked up on `PATH` and executed with the
///   remaining tokens as its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecMode {
    Shell,
    Direct,
}

/// The command to supervise: its argument vector plus the execution mode.
///
/// Arguments are kept as raw OS strings so they reach the child byte for
/// byte; they are only made lossy for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub argv: Vec<OsString>,
    pub mode: ExecMode,
}

impl CommandSpec {
    pub fn new(argv: Vec<OsString>, mode: ExecMode) -> Result<Self> {
        if argv.is_empty() {
            return Err(LogrunError::ConfigError(
                "no command given to run".to_string(),
            ));
        }
        Ok(Self { argv, mode })
    }

    pub fn program(&self) -> &OsStr {
        &self.argv[0]
    }

    pub fn args(&self) -> &[OsString] {
        &self.argv[1..]
    }

    /// The arguments joined with single spaces.
    pub fn joined(&self) -> OsString {
        let mut line = OsString::new();
        for (i, arg) in self.argv.iter().enumerate() {
            if i > 0 {
                line.push(" ");
            }
            line.push(arg);
        }
        line
    }

    /// The line handed to the shell with `-c`.
    pub fn shell_line(&self) -> Result<OsString> {
        let len = self.argv.iter().map(|a| a.len()).sum::<usize>() + self.argv.len() - 1;
        if len > MAX_SHELL_COMMAND_LEN {
            return Err(LogrunError::CommandTooLong {
                len,
                max: MAX_SHELL_COMMAND_LEN,
            });
        }
        Ok(self.joined())
    }
}

/// Heartbeat verbosity: 0 = off, higher levels = shorter interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct HeartbeatLevel(pub u8);

impl HeartbeatLevel {
    pub const OFF: HeartbeatLevel = HeartbeatLevel(0);

    pub fn is_enabled(self) -> bool {
        self.0 > 0
    }

    pub fn interval(self) -> Option<Duration> {
        match self.0 {
            0 => None,
            1 => Some(Duration::from_secs(300)),
            2 => Some(Duration::from_secs(60)),
            _ => Some(Duration::from_secs(20)),
        }
    }
}

/// Strategy used to collect the child's exit disposition once its output
/// has been drained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReapMode {
    /// Block on the tracked child until the kernel reports its exit.
    #[default]
    Wait,
    /// Non-blocking poll, then exactly one retry after a short delay.
    Poll,
}

/// Which of the child's output streams a channel carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    pub fn as_str(self) -> &'static str {
        match self {
            Stream::Stdout => "stdout",
            Stream::Stderr => "stderr",
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
