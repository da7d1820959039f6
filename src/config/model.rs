// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::types::ReapMode;

/// Settings file as read from TOML.
///
/// ```toml
/// [output]
/// dir = "/var/tmp/logs"
///
/// [run]
/// heartbeat = 2
/// shell = "/bin/sh"
/// direct = false
/// reap = "wait"
/// reap_retry_ms = 50
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub output: OutputSection,

    #[serde(default)]
    pub run: RunSection,
}

/// `[output]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    /// Preferred directory for new log files. The `-d` flag wins over it.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// `[run]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunSection {
    /// Heartbeat level used when `-g` is not given.
    #[serde(default)]
    pub heartbeat: u8,

    /// Interpreter used in shell mode.
    #[serde(default = "default_shell")]
    pub shell: PathBuf,

    /// Run commands directly (as with `-x`) by default.
    #[serde(default)]
    pub direct: bool,

    #[serde(default)]
    pub reap: ReapMode,

    /// Delay before the single retry of the `poll` reap strategy.
    #[serde(default = "default_reap_retry_ms")]
    pub reap_retry_ms: u64,
}

pub fn default_shell() -> PathBuf {
    PathBuf::from("/bin/sh")
}

pub fn default_reap_retry_ms() -> u64 {
    50
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            heartbeat: 0,
            shell: default_shell(),
            direct: false,
            reap: ReapMode::default(),
            reap_retry_ms: default_reap_retry_ms(),
        }
    }
}

/// A validated settings file.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub output: OutputSection,
    pub run: RunSection,
}

impl ConfigFile {
    /// Construct without validation; use `TryFrom<RawConfigFile>` instead.
    pub(crate) fn new_unchecked(output: OutputSection, run: RunSection) -> Self {
        Self { output, run }
    }
}
