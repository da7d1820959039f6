// src/cli.rs

//! CLI argument parsing using `clap`.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

/// Command-line arguments for `logrun`.
///
/// Option parsing stops at the first non-option argument, so
/// `logrun -g ls -l` runs `ls -l` with one heartbeat level.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "logrun",
    version,
    about = "Run a command, copying its output to the terminal and to a new log file.",
    long_about = None
)]
pub struct CliArgs {
    /// Place output files in this directory.
    ///
    /// If not usable, falls back to `$LOGRUN_DIR`, then `$HOME/logs/`, then
    /// the current directory.
    #[arg(short = 'd', value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Print time statistics every 5 minutes; `-gg` every minute, `-ggg`
    /// every 20 seconds.
    #[arg(short = 'g', action = ArgAction::Count)]
    pub heartbeat: u8,

    /// Treat COMMAND as an executable and its arguments instead of passing
    /// the joined command line through the shell.
    #[arg(short = 'x')]
    pub direct: bool,

    /// Path to a TOML settings file.
    ///
    /// Default: `$LOGRUN_CONFIG`, or `$HOME/.logrun.toml` if it exists.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Diagnostics level (error, warn, info, debug, trace).
    ///
    /// If omitted, `LOGRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// The command to run, followed by its arguments.
    ///
    /// Passed to the child byte for byte; need not be valid UTF-8.
    #[arg(
        value_name = "COMMAND",
        value_parser = clap::value_parser!(OsString),
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<OsString>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

/// Parse from an explicit argument list (first item is the program name).
pub fn try_parse_from<I, T>(args: I) -> Result<CliArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    CliArgs::try_parse_from(args)
}
