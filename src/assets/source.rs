use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::errors::{EncoError, Result};

/// Where pooled resources read their bytes from.
pub trait AssetSource {
    fn read(&self, path: &Path) -> Result<Vec<u8>>;
}

/// Reads files below a root directory.
#[derive(Debug, Clone)]
pub struct FileSystemSource {
    root: PathBuf,
}

impl FileSystemSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for FileSystemSource {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let full = self.root.join(path);
        std::fs::read(&full).map_err(|err| EncoError::ResourceLoad {
            path: full,
            reason: err.to_string(),
        })
    }
}

/// In-memory files, keyed by relative path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: FxHashMap<PathBuf, Vec<u8>>,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, bytes: Vec<u8>) {
        self.files.insert(path.into(), bytes);
    }
}

impl AssetSource for MemorySource {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| EncoError::ResourceLoad {
            path: path.to_path_buf(),
            reason: "no such file".to_string(),
        })
    }
}
