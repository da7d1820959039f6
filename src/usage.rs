// src/usage.rs

//! CPU time accounting for the supervised command.

use std::io;
use std::time::Duration;

use crate::errors::{LogrunError, Result};

/// User and system CPU time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuTimes {
    pub user: Duration,
    pub system: Duration,
}

/// CPU time of all reaped children of this process.
///
/// Only meaningful once the child has been waited for.
pub fn children_usage() -> Result<CpuTimes> {
    // SAFETY: `rusage` is plain data and getrusage only writes into it.
    let mut ru: libc::rusage = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::getrusage(libc::RUSAGE_CHILDREN, &mut ru) };
    if rc < 0 {
        return Err(LogrunError::ResourceUsage(io::Error::last_os_error()));
    }
    Ok(CpuTimes {
        user: timeval_to_duration(ru.ru_utime),
        system: timeval_to_duration(ru.ru_stime),
    })
}

fn timeval_to_duration(tv: libc::timeval) -> Duration {
    let secs = u64::try_from(tv.tv_sec).unwrap_or(0);
    let micros = u32::try_from(tv.tv_usec).unwrap_or(0);
    Duration::from_secs(secs) + Duration::from_micros(u64::from(micros))
}

/// Best-effort CPU time of a running process and its reaped descendants.
///
/// Returns `None` when the platform offers no cheap way to ask, or when the
/// process has already gone.
#[cfg(target_os = "linux")]
pub fn process_usage(pid: u32) -> Option<CpuTimes> {
    let stat = std::fs::read_to_string(format!("/proc/{pid}/stat")).ok()?;
    // SAFETY: sysconf has no preconditions.
    let ticks = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
    let usage = parse_proc_stat(&stat, u64::try_from(ticks).ok()?);
    tracing::trace!(pid, ?usage, "sampled child cpu usage");
    usage
}

#[cfg(not(target_os = "linux"))]
pub fn process_usage(_pid: u32) -> Option<CpuTimes> {
    None
}

/// Parse `utime + cutime` and `stime + cstime` out of a `/proc/<pid>/stat`
/// line. The command name field may contain spaces and parentheses, so
/// fields are counted from the last `)`.
pub fn parse_proc_stat(stat: &str, ticks_per_sec: u64) -> Option<CpuTimes> {
    if ticks_per_sec == 0 {
        return None;
    }
    let after_comm = &stat[stat.rfind(')')? + 1..];
    let fields: Vec<&str> = after_comm.split_whitespace().collect();
    // fields[0] is the state (field 3 of the full line).
    let field = |n: usize| fields.get(n - 3)?.parse::<u64>().ok();
    let user_ticks = field(14)? + field(16)?;
    let system_ticks = field(15)? + field(17)?;

    let to_duration = |ticks: u64| {
        Duration::from_secs(ticks / ticks_per_sec)
            + Duration::from_nanos((ticks % ticks_per_sec) * 1_000_000_000 / ticks_per_sec)
    };
    Some(CpuTimes {
        user: to_duration(user_ticks),
        system: to_duration(system_ticks),
    })
}
