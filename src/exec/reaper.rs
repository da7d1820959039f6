// src/exec/reaper.rs

//! Collecting the child's exit disposition once its output is drained.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::errors::{LogrunError, Result};
use crate::exec::disposition::ExitDisposition;
use crate::exec::launcher::ChildProcess;

pub const DEFAULT_REAP_RETRY_DELAY: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReapStrategy {
    /// Wait for the tracked child until it exits. No race with pipe closure,
    /// but blocks for as long as a child that closed its output keeps
    /// running.
    #[default]
    Wait,
    /// Poll once; if the child is not finished, wait `retry_delay` and poll
    /// exactly once more. Absorbs the short window between a child closing
    /// its pipes and the kernel recording its exit, and never blocks longer
    /// than `retry_delay`.
    Poll { retry_delay: Duration },
}

/// Reap `process`, consuming the handle.
pub async fn reap(mut process: ChildProcess, strategy: ReapStrategy) -> Result<ExitDisposition> {
    let pid = process.pid();
    let disposition = match strategy {
        ReapStrategy::Wait => {
            let status = process
                .child_mut()
                .wait()
                .await
                .map_err(|source| LogrunError::Reap { pid, source })?;
            ExitDisposition::from_status(status)
        }
        ReapStrategy::Poll { retry_delay } => poll_twice(&mut process, retry_delay).await?,
    };

    debug!(pid, ?disposition, "child reaped");
    Ok(disposition)
}

async fn poll_twice(process: &mut ChildProcess, retry_delay: Duration) -> Result<ExitDisposition> {
    let pid = process.pid();
    let mut retried = false;

    loop {
        match process.child_mut().try_wait() {
            Ok(Some(status)) => return Ok(ExitDisposition::from_status(status)),
            Ok(None) if !retried => {
                debug!(
                    pid,
                    delay_ms = retry_delay.as_millis() as u64,
                    "child not finished yet; retrying once"
                );
                sleep(retry_delay).await;
                retried = true;
            }
            Ok(None) => {
                warn!(pid, "child still running after its output closed; exit status unknown");
                return Ok(ExitDisposition::Unknown);
            }
            Err(e) if e.raw_os_error() == Some(libc::ECHILD) => {
                warn!(pid, "child was reaped elsewhere; exit status unknown");
                return Ok(ExitDisposition::Unknown);
            }
            Err(source) => return Err(LogrunError::Reap { pid, source }),
        }
    }
}
