// src/engine/session.rs

use std::io::Write;
use std::path::PathBuf;

use tracing::info;

use crate::clock::Clock;
use crate::config::Settings;
use crate::errors::{LogrunError, Result};
use crate::exec::{
    ExitDisposition, Heartbeat, Launch, Launched, Multiplexer, Stopwatch, StreamChannel, launch,
    reap,
};
use crate::sink::{SharedSink, Tee, TerminalStream, shared};
use crate::transcript::{self, HostInfo};
use crate::types::Stream;
use crate::usage;

/// The invoking terminal's output streams.
#[derive(Clone)]
pub struct Terminal {
    pub stdout: TerminalStream,
    pub stderr: TerminalStream,
}

impl Terminal {
    pub fn new(stdout: SharedSink, stderr: SharedSink) -> Self {
        Self {
            stdout: TerminalStream::new("stdout", stdout),
            stderr: TerminalStream::new("stderr", stderr),
        }
    }

    pub fn stdio() -> Self {
        Self::new(shared(std::io::stdout()), shared(std::io::stderr()))
    }
}

/// One supervised run, from header to footer.
pub struct Session<C: Clock> {
    settings: Settings,
    clock: C,
    terminal: Terminal,
    log: SharedSink,
    log_path: PathBuf,
    host: HostInfo,
}

impl<C: Clock> Session<C> {
    pub fn new(
        settings: Settings,
        clock: C,
        terminal: Terminal,
        log: SharedSink,
        log_path: PathBuf,
    ) -> Self {
        Self {
            settings,
            clock,
            terminal,
            log,
            log_path,
            host: HostInfo::current(),
        }
    }

    /// Replace the working-directory / uid details shown in the header.
    pub fn with_host(mut self, host: HostInfo) -> Self {
        self.host = host;
        self
    }

    /// Run the command to completion and return how it ended.
    ///
    /// On error the transcript is left without a footer; the caller decides
    /// how to report it.
    pub async fn run(self) -> Result<ExitDisposition> {
        let Session {
            settings,
            clock,
            terminal,
            log,
            log_path,
            host,
        } = self;

        let mut status = Tee::new(terminal.stderr.clone(), log.clone());
        let saved_note = transcript::saved_to(&log_path);
        terminal.stderr.write_best_effort(saved_note.as_bytes());

        let stopwatch = Stopwatch::start(&clock)?;
        let header = transcript::header(&settings.command, stopwatch.started(), &host);
        status
            .write_all(header.as_bytes())
            .map_err(LogrunError::log_write)?;
        status.flush().map_err(LogrunError::log_write)?;

        let heartbeat = Heartbeat::new(settings.heartbeat, clock.now()?);

        let disposition = match launch(&settings.command, &settings.shell)? {
            Launch::Running(Launched {
                process,
                stdout,
                stderr,
            }) => {
                let pid = process.pid();
                info!(pid, log = %log_path.display(), "supervising child");

                let channels = [
                    StreamChannel::new(
                        Stream::Stdout,
                        stdout,
                        Tee::new(terminal.stdout.clone(), log.clone()),
                    ),
                    StreamChannel::new(
                        Stream::Stderr,
                        stderr,
                        Tee::new(terminal.stderr.clone(), log.clone()),
                    ),
                ];
                let mut multiplexer =
                    Multiplexer::new(&clock, stopwatch, heartbeat, status.clone())
                        .with_child_pid(pid);
                let summary = multiplexer.run(channels).await?;
                info!(
                    pid,
                    stdout_bytes = summary.stdout_bytes,
                    stderr_bytes = summary.stderr_bytes,
                    heartbeats = summary.heartbeats,
                    "child output closed; reaping"
                );

                reap(process, settings.reap).await?
            }
            Launch::ExecFailed(failure) => {
                let mut route = Tee::new(terminal.stderr.clone(), log.clone());
                route
                    .write_all(failure.message.as_bytes())
                    .map_err(LogrunError::log_write)?;
                ExitDisposition::Exited(failure.status)
            }
        };

        let now = clock.now()?;
        let cpu = usage::children_usage()?;
        let footer = transcript::footer(now, stopwatch.elapsed(now), &cpu, &disposition);
        status
            .write_all(footer.as_bytes())
            .map_err(LogrunError::log_write)?;
        status.flush().map_err(LogrunError::log_write)?;
        terminal.stderr.write_best_effort(saved_note.as_bytes());

        info!(?disposition, exit_code = disposition.exit_code(), "session finished");
        Ok(disposition)
    }
}
