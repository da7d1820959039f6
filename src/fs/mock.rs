// src/fs/mock.rs

use super::FileSystem;
use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(Vec<u8>),
    Dir { writable: bool },
}

/// In-memory filesystem for output-file tests.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    entries: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        self.insert(path.as_ref(), MockEntry::Dir { writable: true });
    }

    /// A directory that exists but cannot be written to.
    pub fn add_readonly_dir(&self, path: impl AsRef<Path>) {
        self.insert(path.as_ref(), MockEntry::Dir { writable: false });
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        self.insert(path.as_ref(), MockEntry::File(content.into()));
    }

    /// Contents written to a file so far.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        let entries = self.entries.lock().unwrap();
        match entries.get(path.as_ref()) {
            Some(MockEntry::File(data)) => Some(data.clone()),
            _ => None,
        }
    }

    fn insert(&self, path: &Path, entry: MockEntry) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(path.to_path_buf(), entry);
    }
}

impl FileSystem for MockFileSystem {
    fn is_usable_dir(&self, path: &Path) -> bool {
        let entries = self.entries.lock().unwrap();
        matches!(entries.get(path), Some(MockEntry::Dir { writable: true }))
    }

    fn list_names(&self, path: &Path) -> Result<Vec<String>> {
        let entries = self.entries.lock().unwrap();
        if !matches!(entries.get(path), Some(MockEntry::Dir { .. })) {
            return Err(anyhow!("Not a directory or not found: {:?}", path));
        }
        Ok(entries
            .keys()
            .filter(|p| p.parent() == Some(path))
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .map(str::to_string)
            .collect())
    }

    fn create_new(&self, path: &Path) -> io::Result<Box<dyn Write + Send>> {
        let mut entries = self.entries.lock().unwrap();
        if entries.contains_key(path) {
            return Err(io::Error::from(io::ErrorKind::AlreadyExists));
        }
        let parent_ok = path
            .parent()
            .is_some_and(|p| matches!(entries.get(p), Some(MockEntry::Dir { writable: true })));
        if !parent_ok {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        entries.insert(path.to_path_buf(), MockEntry::File(Vec::new()));
        Ok(Box::new(MockWriter {
            entries: Arc::clone(&self.entries),
            path: path.to_path_buf(),
        }))
    }
}

struct MockWriter {
    entries: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
    path: PathBuf,
}

impl Write for MockWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get_mut(&self.path) {
            Some(MockEntry::File(data)) => {
                data.extend_from_slice(buf);
                Ok(buf.len())
            }
            _ => Err(io::Error::from(io::ErrorKind::NotFound)),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
