//! Asset sources
//!
//! The loader reads bytes through an [`AssetSource`], addressed by paths
//! relative to an asset root. [`FsSource`] reads from disk; [`MemorySource`]
//! serves registered files and records every request.

use crate::error::SourceError;
use rustc_hash::FxHashMap;
use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::trace;

/// Boxed future returned by [`AssetSource::fetch`]
pub type FetchFuture = Pin<Box<dyn Future<Output = Result<Vec<u8>, SourceError>> + Send>>;

/// Byte provider for model and material files
pub trait AssetSource: Send + Sync {
    /// Fetch the full contents of `path`
    fn fetch(&self, path: &str) -> FetchFuture;

    /// Name for logs
    fn name(&self) -> &'static str;
}

/// Reads assets from a directory with tokio's file API
#[derive(Clone, Debug)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve an asset path against the root
    ///
    /// Site-absolute paths (`/models/lamp.obj`) are taken relative to the
    /// root; parent components are refused.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, SourceError> {
        let relative = Path::new(path.trim_start_matches("./").trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if relative.as_os_str().is_empty() || escapes {
            return Err(SourceError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl AssetSource for FsSource {
    fn fetch(&self, path: &str) -> FetchFuture {
        let requested = path.to_string();
        let resolved = self.resolve(path);
        Box::pin(async move {
            let full = resolved?;
            trace!(path = %full.display(), "reading asset");
            tokio::fs::read(&full).await.map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    SourceError::NotFound(requested)
                } else {
                    SourceError::Io {
                        path: requested,
                        reason: e.to_string(),
                    }
                }
            })
        })
    }

    fn name(&self) -> &'static str {
        "filesystem"
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    files: FxHashMap<String, Arc<[u8]>>,
    requested: Vec<String>,
    served: Vec<String>,
}

/// In-memory source, used for tests and bundled assets
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    state: Arc<Mutex<MemoryState>>,
    latency: Duration,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every fetch by `latency` before answering
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn insert(&self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        let bytes: Vec<u8> = bytes.into();
        self.lock().files.insert(path.into(), bytes.into());
    }

    /// Paths in the order they were requested
    pub fn requested(&self) -> Vec<String> {
        self.lock().requested.clone()
    }

    /// Paths whose fetch ran to completion
    pub fn served(&self) -> Vec<String> {
        self.lock().served.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AssetSource for MemorySource {
    fn fetch(&self, path: &str) -> FetchFuture {
        self.lock().requested.push(path.to_string());

        let state = Arc::clone(&self.state);
        let latency = self.latency;
        let path = path.to_string();
        Box::pin(async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
            let bytes = state
                .files
                .get(&path)
                .map(|b| b.to_vec())
                .ok_or_else(|| SourceError::NotFound(path.clone()))?;
            state.served.push(path);
            Ok::<_, SourceError>(bytes)
        })
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
