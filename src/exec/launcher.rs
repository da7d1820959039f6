// src/exec/launcher.rs

//! Child process creation.

use std::io;
use std::path::Path;
use std::process::Stdio;

use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tracing::{debug, info};

use crate::errors::{LogrunError, Result};
use crate::types::{CommandSpec, ExecMode};

/// Exit status reported when the program could not be found.
pub const EXIT_NOT_FOUND: i32 = 127;
/// Exit status reported when the program was found but could not be run.
pub const EXIT_NOT_EXECUTABLE: i32 = 126;

/// A running child. Owned by the launcher's caller until the reaper takes it.
#[derive(Debug)]
pub struct ChildProcess {
    pid: u32,
    command: CommandSpec,
    child: Child,
}

impl ChildProcess {
    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn command(&self) -> &CommandSpec {
        &self.command
    }

    pub(crate) fn child_mut(&mut self) -> &mut Child {
        &mut self.child
    }
}

/// A child together with the read ends of its output pipes.
#[derive(Debug)]
pub struct Launched {
    pub process: ChildProcess,
    pub stdout: ChildStdout,
    pub stderr: ChildStderr,
}

/// The command could not be executed once the process was being set up.
///
/// This is ordinary child output plus an ordinary exit status, not a fatal
/// error for logrun.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecFailure {
    /// Diagnostic to show on the child's stderr route, newline terminated.
    pub message: String,
    pub status: i32,
}

#[derive(Debug)]
pub enum Launch {
    Running(Launched),
    ExecFailed(ExecFailure),
}

/// Start `command` with stdout and stderr connected to fresh pipes.
///
/// stdin is inherited untouched. Every descriptor the parent opens is
/// close-on-exec, so the child sees only its three standard streams plus
/// whatever it inherited from logrun's own parent.
pub fn launch(command: &CommandSpec, shell: &Path) -> Result<Launch> {
    let (mut cmd, shown) = match command.mode {
        ExecMode::Direct => {
            let mut c = Command::new(command.program());
            c.args(command.args());
            (c, command.program().to_string_lossy().into_owned())
        }
        ExecMode::Shell => {
            let line = command.shell_line()?;
            let mut c = Command::new(shell);
            c.arg("-c").arg(&line);
            (c, line.to_string_lossy().into_owned())
        }
    };

    cmd.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(false);

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) if is_exec_failure(&e) => {
            let failure = exec_failure(command, shell, &e);
            info!(
                command = %shown,
                error = %e,
                status = failure.status,
                "command could not be executed"
            );
            return Ok(Launch::ExecFailed(failure));
        }
        Err(source) => {
            return Err(LogrunError::Spawn {
                command: shown,
                source,
            });
        }
    };

    let missing = |what: &str| LogrunError::Spawn {
        command: shown.clone(),
        source: io::Error::other(format!("child {what} unavailable")),
    };
    let pid = child.id().ok_or_else(|| missing("pid"))?;
    let stdout = child.stdout.take().ok_or_else(|| missing("stdout pipe"))?;
    let stderr = child.stderr.take().ok_or_else(|| missing("stderr pipe"))?;

    debug!(pid, command = %shown, mode = ?command.mode, "child started");

    Ok(Launch::Running(Launched {
        process: ChildProcess {
            pid,
            command: command.clone(),
            child,
        },
        stdout,
        stderr,
    }))
}

/// Spawn errors that come from the exec step rather than from creating the
/// process itself.
fn is_exec_failure(e: &io::Error) -> bool {
    matches!(
        e.raw_os_error(),
        Some(
            libc::ENOENT
                | libc::EACCES
                | libc::EPERM
                | libc::ENOEXEC
                | libc::ENOTDIR
                | libc::ELOOP
                | libc::ENAMETOOLONG
                | libc::E2BIG
        )
    )
}

fn exec_failure(command: &CommandSpec, shell: &Path, e: &io::Error) -> ExecFailure {
    let message = match command.mode {
        ExecMode::Direct => format!(
            "execvp({}) failed: {e}\n",
            command.program().to_string_lossy()
        ),
        ExecMode::Shell => format!(
            "execl({} -c '{}') failed: {e}\n",
            shell.display(),
            command.joined().to_string_lossy()
        ),
    };
    let status = if e.raw_os_error() == Some(libc::ENOENT) {
        EXIT_NOT_FOUND
    } else {
        EXIT_NOT_EXECUTABLE
    };
    ExecFailure { message, status }
}
