// src/output/mod.rs

//! Choosing where the transcript goes.
//!
//! - [`select_directory`] walks the candidate directories in priority order.
//! - [`create_output_file`] picks the next `Out_YYMMDD_NN` name in that
//!   directory and creates it exclusively, so concurrent or repeated runs
//!   never share a file.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

use crate::config::Environment;
use crate::errors::{LogrunError, Result};
use crate::fs::FileSystem;

pub const LOGRUN_DIR_ENV: &str = "LOGRUN_DIR";
pub const HOME_LOG_DIR: &str = "logs";
pub const FILE_PREFIX: &str = "Out_";

const MAX_CREATE_ATTEMPTS: u64 = 1000;

/// A freshly created, empty transcript file.
pub struct OutputFile {
    pub path: PathBuf,
    pub writer: Box<dyn Write + Send>,
}

impl std::fmt::Debug for OutputFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputFile")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Pick the output directory.
///
/// Order: the preferred directory (`-d` or settings file), `$LOGRUN_DIR`,
/// `$HOME/logs`, and finally the current directory, which is used even if it
/// fails the check (file creation will then report the real error).
pub fn select_directory(
    fs: &dyn FileSystem,
    preferred: Option<&Path>,
    env: &Environment,
) -> PathBuf {
    if let Some(dir) = preferred {
        if fs.is_usable_dir(dir) {
            return dir.to_path_buf();
        }
        warn!(dir = %dir.display(), "requested output directory is not usable");
    }

    if let Some(dir) = &env.logrun_dir {
        if fs.is_usable_dir(dir) {
            return dir.clone();
        }
        warn!(dir = %dir.display(), "${} is not a usable directory", LOGRUN_DIR_ENV);
    }

    if let Some(home) = &env.home {
        let dir = home.join(HOME_LOG_DIR);
        if fs.is_usable_dir(&dir) {
            return dir;
        }
        debug!(dir = %dir.display(), "no usable log directory under $HOME");
    }

    PathBuf::from(".")
}

/// `Out_YYMMDD_` for the given date.
pub fn date_prefix(date: NaiveDate) -> String {
    format!(
        "{FILE_PREFIX}{:02}{:02}{:02}_",
        date.year().rem_euclid(100),
        date.month(),
        date.day()
    )
}

/// One past the highest numeric suffix among names sharing `prefix`.
///
/// Suffixes are read like `strtoul`: leading digits only, none counts as 0.
/// The result is never less than 1.
pub fn next_index<'a>(names: impl IntoIterator<Item = &'a str>, prefix: &str) -> u64 {
    names
        .into_iter()
        .filter_map(|name| name.strip_prefix(prefix))
        .map(|rest| {
            let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
            digits.parse::<u64>().unwrap_or(0)
        })
        .filter(|&n| n < u64::MAX)
        .fold(1, |next, n| next.max(n + 1))
}

/// Create the next unused transcript file in `dir`.
pub fn create_output_file(
    fs: &dyn FileSystem,
    dir: &Path,
    date: NaiveDate,
) -> Result<OutputFile> {
    let prefix = date_prefix(date);
    let names = fs
        .list_names(dir)
        .map_err(|e| LogrunError::OutputFile(format!("{}: {e:#}", dir.display())))?;
    let mut index = next_index(names.iter().map(String::as_str), &prefix);

    for _ in 0..MAX_CREATE_ATTEMPTS {
        let path = dir.join(format!("{prefix}{index:02}"));
        match fs.create_new(&path) {
            Ok(writer) => {
                debug!(path = %path.display(), "created output file");
                return Ok(OutputFile { path, writer });
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                debug!(path = %path.display(), "output file appeared concurrently; trying next index");
                index += 1;
            }
            Err(e) => {
                return Err(LogrunError::OutputFile(format!("{}: {e}", path.display())));
            }
        }
    }

    Err(LogrunError::OutputFile(format!(
        "{}: no free file name after {MAX_CREATE_ATTEMPTS} attempts",
        dir.display()
    )))
}
