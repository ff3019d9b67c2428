//! Local audio files exposed as short-lived playable handles

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
};

use axum::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Opaque reference to a loaded file, served at `/media/{id}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaHandle(u64);

impl MediaHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }

    pub fn url(&self) -> String {
        format!("/media/{}", self.0)
    }
}

/// Failures of the media host
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("File not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Not a regular file: {path}")]
    NotAFile { path: PathBuf },

    #[error("File is empty: {path}")]
    Empty { path: PathBuf },

    #[error("Unknown media handle: {0}")]
    UnknownHandle(u64),

    #[error("Playback refused: {0}")]
    Refused(String),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MediaError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Host side of the audio player: creates and releases playable handles
/// and starts playback.
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Check that `path` names something playable
    async fn probe(&self, path: &Path) -> Result<(), MediaError>;

    /// Mint a handle bound to an already probed path
    fn create_handle(&self, path: &Path) -> MediaHandle;

    /// Drop a handle. Releasing an unknown handle is a no-op.
    fn release(&self, handle: MediaHandle);

    /// File behind a live handle
    fn resolve(&self, handle: MediaHandle) -> Option<PathBuf>;

    /// Start playback; may be refused
    async fn play(&self, handle: MediaHandle) -> Result<(), MediaError>;

    fn pause(&self, handle: MediaHandle);

    /// Number of handles not yet released
    fn live_handles(&self) -> usize;
}

/// Media host backed by files on the local disk
#[derive(Debug)]
pub struct LocalMediaHost {
    next_id: AtomicU64,
    handles: Mutex<HashMap<u64, PathBuf>>,
}

impl LocalMediaHost {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            handles: Mutex::new(HashMap::new()),
        }
    }

    async fn check_file(path: &Path) -> Result<(), MediaError> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| MediaError::io(path, e))?;
        if !metadata.is_file() {
            return Err(MediaError::NotAFile {
                path: path.to_path_buf(),
            });
        }
        if metadata.len() == 0 {
            return Err(MediaError::Empty {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl MediaHost for LocalMediaHost {
    async fn probe(&self, path: &Path) -> Result<(), MediaError> {
        Self::check_file(path).await
    }

    fn create_handle(&self, path: &Path) -> MediaHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        match self.handles.lock() {
            Ok(mut handles) => {
                handles.insert(id, path.to_path_buf());
            }
            Err(e) => warn!("Failed to lock media handles: {}", e),
        }
        info!("Created media handle {} for {}", id, path.display());
        MediaHandle::new(id)
    }

    fn release(&self, handle: MediaHandle) {
        match self.handles.lock() {
            Ok(mut handles) => {
                if handles.remove(&handle.id()).is_some() {
                    debug!("Released media handle {}", handle.id());
                }
            }
            Err(e) => warn!("Failed to lock media handles: {}", e),
        }
    }

    fn resolve(&self, handle: MediaHandle) -> Option<PathBuf> {
        self.handles
            .lock()
            .ok()
            .and_then(|handles| handles.get(&handle.id()).cloned())
    }

    async fn play(&self, handle: MediaHandle) -> Result<(), MediaError> {
        let path = self
            .resolve(handle)
            .ok_or(MediaError::UnknownHandle(handle.id()))?;
        Self::check_file(&path).await?;
        info!("Playing {}", path.display());
        Ok(())
    }

    fn pause(&self, handle: MediaHandle) {
        debug!("Paused media handle {}", handle.id());
    }

    fn live_handles(&self) -> usize {
        self.handles.lock().map(|h| h.len()).unwrap_or(0)
    }
}

impl Default for LocalMediaHost {
    fn default() -> Self {
        Self::new()
    }
}
