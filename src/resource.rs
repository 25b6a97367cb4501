//! Host resource access for the locale-map table
//!
//! The host addresses resources by path (e.g. `/Configuration/locales.txt`). Fetch
//! failures are reported as [`MtError::Configuration`].

use crate::error::{MtError, MtResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Byte-level access to host resources
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Fetch the full content of the resource at `path`
    async fn fetch(&self, path: &str) -> MtResult<Vec<u8>>;
}

/// Resources resolved against a directory on the local filesystem
///
/// A leading `/` in the resource path is relative to `root`, not the filesystem root.
#[derive(Debug, Clone)]
pub struct FsResourceStore {
    root: PathBuf,
}

impl FsResourceStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

#[async_trait]
impl ResourceStore for FsResourceStore {
    async fn fetch(&self, path: &str) -> MtResult<Vec<u8>> {
        let full = self.resolve(path);
        tokio::fs::read(&full).await.map_err(|e| {
            MtError::Configuration(format!(
                "Cannot read resource '{}' ({}): {}",
                path,
                full.display(),
                e
            ))
        })
    }
}

/// In-memory resources, for tests and embedding hosts
#[derive(Debug, Default)]
pub struct MemoryResourceStore {
    resources: HashMap<String, Vec<u8>>,
    fetches: AtomicUsize,
}

impl MemoryResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.resources.insert(path.into(), content.into());
        self
    }

    /// Number of fetch attempts, successful or not
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResourceStore for MemoryResourceStore {
    async fn fetch(&self, path: &str) -> MtResult<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.resources
            .get(path)
            .cloned()
            .ok_or_else(|| MtError::Configuration(format!("Resource not found: {}", path)))
    }
}
