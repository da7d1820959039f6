// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::config::settings::Environment;
use crate::errors::{LogrunError, Result};

pub const CONFIG_ENV: &str = "LOGRUN_CONFIG";
pub const CONFIG_FILE_NAME: &str = ".logrun.toml";

/// Load a settings file and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] for
/// the semantic checks.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        LogrunError::ConfigError(format!("reading {}: {e}", path.display()))
    })?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a settings file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Resolve and load the settings file.
///
/// - An explicit path (from `--config`) must exist.
/// - Otherwise `$LOGRUN_CONFIG` or `$HOME/.logrun.toml` is used when present,
///   and built-in defaults when not.
pub fn load_optional(explicit: Option<&Path>, env: &Environment) -> Result<ConfigFile> {
    if let Some(path) = explicit {
        return load_and_validate(path);
    }

    match default_config_path(env) {
        Some(path) if path.is_file() => {
            debug!(path = %path.display(), "loading settings file");
            load_and_validate(&path)
        }
        Some(path) => {
            debug!(path = %path.display(), "no settings file; using defaults");
            Ok(ConfigFile::default())
        }
        None => Ok(ConfigFile::default()),
    }
}

/// Where the settings file is looked for when `--config` is not given.
pub fn default_config_path(env: &Environment) -> Option<PathBuf> {
    if let Some(path) = &env.config_path {
        return Some(path.clone());
    }
    env.home.as_ref().map(|home| home.join(CONFIG_FILE_NAME))
}
