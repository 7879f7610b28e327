use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::foundation::error::{ReelError, ReelResult};

/// Provider of encoded frame bytes, addressed by asset path (`{base}/{00001}.png`).
///
/// Implementations must be shareable across the preload worker pool.
pub trait FrameSource: Send + Sync {
    /// Fetch the encoded bytes stored at `asset_path`.
    fn fetch(&self, asset_path: &str) -> ReelResult<Vec<u8>>;
}

/// Serves asset paths from a directory on disk, treating `root` as the site root.
#[derive(Clone, Debug)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path an asset path resolves to. Leading slashes are relative to `root`.
    pub fn resolve(&self, asset_path: &str) -> PathBuf {
        self.root.join(asset_path.trim_start_matches('/'))
    }
}

impl FrameSource for DirSource {
    fn fetch(&self, asset_path: &str) -> ReelResult<Vec<u8>> {
        let path = self.resolve(asset_path);
        std::fs::read(&path)
            .with_context(|| format!("read frame bytes from '{}'", path.display()))
            .map_err(ReelError::from)
    }
}

/// In-memory source keyed by asset path, for embedding and tests.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    files: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, asset_path: impl Into<String>, bytes: Vec<u8>) {
        self.files.insert(asset_path.into(), bytes);
    }

    pub fn with(mut self, asset_path: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(asset_path, bytes);
        self
    }
}

impl FrameSource for MemorySource {
    fn fetch(&self, asset_path: &str) -> ReelResult<Vec<u8>> {
        self.files
            .get(asset_path)
            .cloned()
            .ok_or_else(|| ReelError::asset(format!("no such asset '{asset_path}'")))
    }
}
