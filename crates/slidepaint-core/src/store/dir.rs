//! Directory-backed slide store for native platforms.

use super::{BoxFuture, SlideStore, StoreError, StoreResult};
use crate::deck::SLIDE_KEY_EXTENSION;
use std::fs;
use std::path::PathBuf;

/// Reads slides from a project directory.
///
/// Files under `<root>/slides/` are exposed as `/slides/<file name>` keys, so
/// `<root>/slides/slide-3.json` is the key `/slides/slide-3.json`.
pub struct DirSlideStore {
    root: PathBuf,
}

impl DirSlideStore {
    /// Create a store rooted at `root`. The directory does not have to exist
    /// yet; a missing `slides/` directory lists as empty.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the root path.
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    fn slides_dir(&self) -> PathBuf {
        self.root.join("slides")
    }

    /// Map a key back to a file path, refusing anything outside `slides/`.
    fn key_path(&self, key: &str) -> Option<PathBuf> {
        let name = key.strip_prefix("/slides/")?;
        if name.is_empty() || name.contains('/') || name.contains('\\') || name.starts_with('.') {
            return None;
        }
        Some(self.slides_dir().join(name))
    }
}

impl SlideStore for DirSlideStore {
    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<String>>> {
        let dir = self.slides_dir();
        Box::pin(async move {
            if !dir.exists() {
                return Ok(vec![]);
            }

            let entries = fs::read_dir(&dir).map_err(|e| {
                StoreError::Io(format!("Failed to read {}: {}", dir.display(), e))
            })?;

            let mut keys = Vec::new();
            for entry in entries.flatten() {
                let path = entry.path();
                if !path.is_file() {
                    continue;
                }
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    if name.ends_with(SLIDE_KEY_EXTENSION) {
                        keys.push(format!("/slides/{}", name));
                    }
                }
            }
            Ok(keys)
        })
    }

    fn read(&self, key: &str) -> BoxFuture<'_, StoreResult<String>> {
        let path = self.key_path(key);
        let key = key.to_string();
        Box::pin(async move {
            let Some(path) = path else {
                return Err(StoreError::NotFound(key));
            };
            if !path.exists() {
                return Err(StoreError::NotFound(key));
            }
            fs::read_to_string(&path).map_err(|e| {
                StoreError::Io(format!("Failed to read {}: {}", path.display(), e))
            })
        })
    }
}
