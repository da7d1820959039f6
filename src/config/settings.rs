// src/config/settings.rs

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::CliArgs;
use crate::config::loader::CONFIG_ENV;
use crate::config::model::ConfigFile;
use crate::errors::Result;
use crate::exec::ReapStrategy;
use crate::output::LOGRUN_DIR_ENV;
use crate::types::{CommandSpec, ExecMode, HeartbeatLevel, ReapMode};

/// Snapshot of the environment variables logrun consults.
///
/// Captured once in `main` so the rest of the crate never reads the process
/// environment directly.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    /// `$LOGRUN_DIR`
    pub logrun_dir: Option<PathBuf>,
    /// `$HOME`
    pub home: Option<PathBuf>,
    /// `$LOGRUN_CONFIG`
    pub config_path: Option<PathBuf>,
}

impl Environment {
    pub fn from_process() -> Self {
        let var = |name: &str| {
            std::env::var_os(name)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        Self {
            logrun_dir: var(LOGRUN_DIR_ENV),
            home: var("HOME"),
            config_path: var(CONFIG_ENV),
        }
    }
}

/// Fully resolved settings for one supervised run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub command: CommandSpec,
    pub heartbeat: HeartbeatLevel,
    pub shell: PathBuf,
    pub reap: ReapStrategy,
    /// Preferred output directory (`-d`, else `[output].dir`).
    pub dir: Option<PathBuf>,
}

impl Settings {
    /// Merge the settings file with the command line; the command line wins.
    pub fn resolve(args: &CliArgs, file: &ConfigFile) -> Result<Self> {
        let mode = if args.direct || file.run.direct {
            ExecMode::Direct
        } else {
            ExecMode::Shell
        };
        let command = CommandSpec::new(args.command.clone(), mode)?;

        let heartbeat = if args.heartbeat > 0 {
            HeartbeatLevel(args.heartbeat)
        } else {
            HeartbeatLevel(file.run.heartbeat)
        };

        let reap = match file.run.reap {
            ReapMode::Wait => ReapStrategy::Wait,
            ReapMode::Poll => ReapStrategy::Poll {
                retry_delay: Duration::from_millis(file.run.reap_retry_ms),
            },
        };

        Ok(Self {
            command,
            heartbeat,
            shell: file.run.shell.clone(),
            reap,
            dir: args.dir.clone().or_else(|| file.output.dir.clone()),
        })
    }
}
