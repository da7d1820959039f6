// src/logging.rs

//! Diagnostics for logrun itself, via `tracing`.
//!
//! The filter comes from, in order:
//! 1. `--log-level`,
//! 2. the `LOGRUN_LOG` variable, read as an `EnvFilter` directive
//!    (`debug`, `logrun::exec=trace`, ...),
//! 3. `warn`.
//!
//! Output goes to stderr and never into the transcript. The default stays at
//! `warn` since the terminal's stderr is shared with the supervised command.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

pub const LOG_ENV: &str = "LOGRUN_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Install the global subscriber. Call once, before anything logs.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = match cli_level {
        Some(level) => EnvFilter::new(level.as_directive()),
        None => env_filter(std::env::var(LOG_ENV).ok().as_deref()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("installing tracing subscriber")
}

/// Filter for a `LOGRUN_LOG` value; unset, blank or malformed means `warn`.
pub fn env_filter(value: Option<&str>) -> EnvFilter {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| EnvFilter::try_new(v).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
