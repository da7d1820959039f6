// src/fs/mod.rs

use std::ffi::CString;
use std::fmt::Debug;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use anyhow::{Context, Result};

pub mod mock;

/// Filesystem operations needed to pick and create a log file.
pub trait FileSystem: Debug {
    /// True if `path` is a directory we can search and create files in.
    fn is_usable_dir(&self, path: &Path) -> bool;

    /// Names (not paths) of the entries in a directory.
    fn list_names(&self, path: &Path) -> Result<Vec<String>>;

    /// Create a new file, failing with `AlreadyExists` if it is there.
    fn create_new(&self, path: &Path) -> io::Result<Box<dyn Write + Send>>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn is_usable_dir(&self, path: &Path) -> bool {
        if !path.is_dir() {
            return false;
        }
        let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
            return false;
        };
        // SAFETY: `c_path` is a valid NUL-terminated string for the call.
        unsafe { libc::access(c_path.as_ptr(), libc::W_OK | libc::X_OK) == 0 }
    }

    fn list_names(&self, path: &Path) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(path).with_context(|| format!("reading dir {:?}", path))? {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    fn create_new(&self, path: &Path) -> io::Result<Box<dyn Write + Send>> {
        let file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }
}
