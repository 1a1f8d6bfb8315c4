//! Audio storage reader
//!
//! Supplies the complete bytes of one audio asset. Partial or streaming reads
//! are not offered; peak extraction always sees the whole file.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Source of complete audio buffers, addressed by storage key
#[async_trait]
pub trait AudioSource: Send + Sync {
    /// Fetch the full contents stored under `key`
    async fn fetch(&self, key: &str) -> Result<Vec<u8>>;
}

/// Audio stored as files beneath a root directory
///
/// Keys are `/`-separated paths relative to the root.
#[derive(Debug, Clone)]
pub struct FsAudioSource {
    root: PathBuf,
}

impl FsAudioSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a key to a path, refusing anything that leaves the root
    pub fn resolve(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let mut has_name = false;

        for component in relative.components() {
            match component {
                Component::Normal(_) => has_name = true,
                Component::CurDir => {}
                _ => return Err(Error::InvalidKey(key.to_string())),
            }
        }

        if !has_name {
            return Err(Error::InvalidKey(key.to_string()));
        }

        Ok(self.root.join(relative))
    }

    /// Storage key for a path found beneath the root
    pub fn key_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("/"))
        }
    }
}

#[async_trait]
impl AudioSource for FsAudioSource {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.resolve(key)?;
        tracing::debug!(key, path = %path.display(), "Reading audio file");
        Ok(tokio::fs::read(&path).await?)
    }
}
