// src/config/mod.rs

//! Settings for logrun.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a settings file from disk, or fall back to defaults (`loader.rs`).
//! - Validate values that serde cannot check (`validate.rs`).
//! - Merge file, environment and CLI into the resolved `Settings` (`settings.rs`).

pub mod loader;
pub mod model;
pub mod settings;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_optional};
pub use model::{ConfigFile, OutputSection, RawConfigFile, RunSection};
pub use settings::{Environment, Settings};
pub use validate::validate_config;
