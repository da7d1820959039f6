// src/transcript.rs

//! Human-readable markers written around and into the child's output.
//!
//! Every block is rendered into a `String` first and written with a single
//! `write_all`, so a marker never ends up split around a chunk of child
//! output.

use std::fmt::Write as _;
use std::time::Duration;

use crate::clock::Timestamp;
use crate::exec::ExitDisposition;
use crate::types::{CommandSpec, ExecMode};
use crate::usage::CpuTimes;

pub const BAR: &str = "========================================================================";

/// Line terminator for heartbeat blocks; survives terminals the child has
/// switched out of cooked mode.
pub const HEARTBEAT_EOL: &str = "\r\n";
pub const EOL: &str = "\n";

/// Details about the invoking process shown in the header.
#[derive(Debug, Clone)]
pub struct HostInfo {
    /// Current directory, or a description of why it is unknown.
    pub working_dir: String,
    pub effective_uid: u32,
}

impl HostInfo {
    pub fn current() -> Self {
        let working_dir = match std::env::current_dir() {
            Ok(dir) => dir.display().to_string(),
            Err(e) => format!("Unable to find out: {e}"),
        };
        // SAFETY: geteuid cannot fail and has no preconditions.
        let effective_uid = unsafe { libc::geteuid() };
        Self {
            working_dir,
            effective_uid,
        }
    }
}

/// Terminal-only note pointing at the transcript file.
pub fn saved_to(path: &std::path::Path) -> String {
    format!("(This output saved to file: {})\n", path.display())
}

/// `S.mmm`, rounded to the nearest millisecond.
pub fn seconds(d: Duration) -> String {
    let millis = (d.as_micros() + 500) / 1000;
    format!("{}.{:03}", millis / 1000, millis % 1000)
}

/// The `TIME:` line, plus elapsed and CPU lines when given.
pub fn time_block(
    now: Timestamp,
    elapsed: Option<Duration>,
    usage: Option<&CpuTimes>,
    eol: &str,
) -> String {
    let mut out = String::new();
    let _ = write!(out, "TIME: {}{eol}", now.display_local());
    if let Some(elapsed) = elapsed {
        let _ = write!(out, "ELAPSED TIME:  {} sec{eol}", seconds(elapsed));
        if let Some(usage) = usage {
            let _ = write!(
                out,
                "USER CPU TIME: {} sec{eol}SYS CPU TIME:  {} sec{eol}",
                seconds(usage.user),
                seconds(usage.system)
            );
        }
    }
    out
}

pub fn header(command: &CommandSpec, now: Timestamp, host: &HostInfo) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{BAR}");
    out.push_str(&time_block(now, None, None, EOL));
    match command.mode {
        ExecMode::Direct => {
            let _ = writeln!(out, "EXECUTABLE: {}", command.program().to_string_lossy());
            out.push_str("COMMAND LINE:");
            for arg in &command.argv {
                let _ = write!(out, " {}", arg.to_string_lossy());
            }
            out.push_str("\nCOMMAND LINE (QUOTED):");
            for arg in &command.argv {
                let _ = write!(out, " \"{}\"", arg.to_string_lossy());
            }
            out.push('\n');
        }
        ExecMode::Shell => {
            out.push_str("SHELL COMMAND:");
            for arg in &command.argv {
                let _ = write!(out, " {}", arg.to_string_lossy());
            }
            out.push('\n');
        }
    }
    let _ = write!(
        out,
        "WORKING DIRECTORY: {}\nEFFECTIVE USER ID: {}\n{BAR}\n",
        host.working_dir, host.effective_uid
    );
    out
}

pub fn heartbeat(now: Timestamp, elapsed: Duration, usage: Option<&CpuTimes>) -> String {
    let eol = HEARTBEAT_EOL;
    let mut out = format!("{eol}{BAR}{eol}");
    out.push_str(&time_block(now, Some(elapsed), usage, eol));
    let _ = write!(out, "{BAR}{eol}");
    out
}

/// `EXIT STATUS: N`, `EXIT SIGNAL: NAME[ (core dumped)]`, or the unknown
/// marker.
pub fn exit_line(disposition: &ExitDisposition) -> String {
    match disposition {
        ExitDisposition::Exited(code) => format!("EXIT STATUS: {code}\n"),
        ExitDisposition::Signaled {
            signal,
            core_dumped,
        } => format!(
            "EXIT SIGNAL: {}{}\n",
            crate::exec::signal_name(*signal),
            if *core_dumped { " (core dumped)" } else { "" }
        ),
        ExitDisposition::Unknown => "EXIT STATUS UNKNOWN?\n".to_string(),
    }
}

pub fn footer(
    now: Timestamp,
    elapsed: Duration,
    usage: &CpuTimes,
    disposition: &ExitDisposition,
) -> String {
    let mut out = format!("\n{BAR}\n");
    out.push_str(&time_block(now, Some(elapsed), Some(usage), EOL));
    out.push_str(&exit_line(disposition));
    let _ = writeln!(out, "{BAR}");
    out
}
