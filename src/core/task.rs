//! File task definition.

use std::path::PathBuf;

/// A single file discovered in the source directory.
///
/// Created when the directory is listed and consumed exactly once by the
/// pipeline, which turns it into a [`TaskOutcome`](super::TaskOutcome).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    /// Full path to the source image
    pub source_path: PathBuf,
    /// File name within the source directory
    pub file_name: String,
    /// Size on disk at listing time
    pub size_bytes: u64,
}

impl FileTask {
    pub fn new(source_path: impl Into<PathBuf>, file_name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            source_path: source_path.into(),
            file_name: file_name.into(),
            size_bytes,
        }
    }
}
