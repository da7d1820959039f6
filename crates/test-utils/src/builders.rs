#![allow(dead_code)]

use std::path::PathBuf;

use logrun::config::{ConfigFile, OutputSection, RawConfigFile, RunSection};
use logrun::types::ReapMode;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                output: OutputSection::default(),
                run: RunSection::default(),
            },
        }
    }

    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output.dir = Some(dir.into());
        self
    }

    pub fn heartbeat(mut self, level: u8) -> Self {
        self.config.run.heartbeat = level;
        self
    }

    pub fn shell(mut self, shell: impl Into<PathBuf>) -> Self {
        self.config.run.shell = shell.into();
        self
    }

    pub fn direct(mut self, val: bool) -> Self {
        self.config.run.direct = val;
        self
    }

    pub fn reap(mut self, mode: ReapMode, retry_ms: u64) -> Self {
        self.config.run.reap = mode;
        self.config.run.reap_retry_ms = retry_ms;
        self
    }

    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
