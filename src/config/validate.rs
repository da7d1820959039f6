// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{LogrunError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::LogrunError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.output, raw.run))
    }
}

pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    validate_shell(cfg)?;
    validate_reap(cfg)?;
    validate_output(cfg)?;
    Ok(())
}

fn validate_shell(cfg: &RawConfigFile) -> Result<()> {
    let shell = &cfg.run.shell;
    if shell.as_os_str().is_empty() {
        return Err(LogrunError::ConfigError(
            "[run].shell must not be empty".to_string(),
        ));
    }
    if !shell.is_absolute() {
        return Err(LogrunError::ConfigError(format!(
            "[run].shell must be an absolute path (got {})",
            shell.display()
        )));
    }
    Ok(())
}

fn validate_reap(cfg: &RawConfigFile) -> Result<()> {
    let ms = cfg.run.reap_retry_ms;
    if ms == 0 || ms > 10_000 {
        return Err(LogrunError::ConfigError(format!(
            "[run].reap_retry_ms must be between 1 and 10000 (got {ms})"
        )));
    }
    Ok(())
}

fn validate_output(cfg: &RawConfigFile) -> Result<()> {
    if let Some(dir) = &cfg.output.dir {
        if dir.as_os_str().is_empty() {
            return Err(LogrunError::ConfigError(
                "[output].dir must not be empty when set".to_string(),
            ));
        }
    }
    Ok(())
}
