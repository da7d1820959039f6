#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub use logrun_test_utils::init_tracing;

/// Run a future with a 10-second timeout.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(10), f)
        .await
        .expect("Test timed out after 10 seconds")
}

/// All `Out_*` files in `dir`, sorted by name.
pub fn log_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .expect("reading log dir")
        .map(|e| e.expect("dir entry").path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("Out_"))
        })
        .collect();
    files.sort();
    files
}

/// Contents of the single log file in `dir`.
pub fn only_log(dir: &Path) -> String {
    let files = log_files(dir);
    assert_eq!(files.len(), 1, "expected exactly one log file, got {files:?}");
    fs::read_to_string(&files[0]).expect("reading log file")
}
