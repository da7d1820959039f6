// src/errors.rs

//! Crate-wide error type and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogrunError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("unable to create output file: {0}")]
    OutputFile(String),

    #[error("failed to start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command too long: {len} bytes exceeds the {max} byte limit")]
    CommandTooLong { len: usize, max: usize },

    #[error("read failed on child {stream}: {source}")]
    Read {
        stream: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("write to {target} failed: {source}")]
    Sink {
        target: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("getrusage failed: {0}")]
    ResourceUsage(std::io::Error),

    #[error("clock query failed: {0}")]
    Clock(String),

    #[error("waiting for child {pid} failed: {source}")]
    Reap {
        pid: u32,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LogrunError {
    /// Process exit status used when this error aborts the run.
    ///
    /// A missing output file is distinguished from every other setup or
    /// runtime failure.
    pub fn exit_status(&self) -> i32 {
        match self {
            LogrunError::OutputFile(_) => 2,
            _ => 1,
        }
    }

    /// A write to the transcript file failed.
    pub fn log_write(source: std::io::Error) -> Self {
        LogrunError::Sink {
            target: "log file",
            source,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, LogrunError>;
