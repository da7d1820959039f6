// src/exec/disposition.rs

use std::ffi::CStr;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

/// How the supervised command ended.
///
/// Produced exactly once by the reaper and never modified afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDisposition {
    /// Normal exit with the given status code.
    Exited(i32),
    /// Terminated by a signal.
    Signaled { signal: i32, core_dumped: bool },
    /// No disposition could be collected. Must not happen in practice; it is
    /// reported as a failure, never as success.
    Unknown,
}

impl ExitDisposition {
    pub fn from_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            ExitDisposition::Exited(code)
        } else if let Some(signal) = status.signal() {
            ExitDisposition::Signaled {
                signal,
                core_dumped: status.core_dumped(),
            }
        } else {
            ExitDisposition::Unknown
        }
    }

    /// Status logrun itself exits with: the child's code for a normal exit,
    /// 1 for a signal or an unknown outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExitDisposition::Exited(code) => *code,
            ExitDisposition::Signaled { .. } | ExitDisposition::Unknown => 1,
        }
    }
}

/// Human-readable signal description (`strsignal`), e.g. "Killed".
pub fn signal_name(signal: i32) -> String {
    // SAFETY: strsignal returns a pointer to a NUL-terminated string that
    // stays valid until the next call; it is copied out immediately.
    let ptr = unsafe { libc::strsignal(signal) };
    if ptr.is_null() {
        return format!("Unknown signal {signal}");
    }
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}
