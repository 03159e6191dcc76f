//! License blob storage.
//!
//! License material arrives as a directory of opaque files whose format and
//! content are vendor-defined. The store reads every file it can and keeps
//! the rest of the directory's problems to log records; a missing directory
//! is an empty store, and the activation step decides whether that is fatal.

use crate::error::Result;
use std::path::Path;
use tracing::{debug, warn};

/// In-memory collection of license blobs read from disk.
#[derive(Debug, Clone, Default)]
pub struct LicenseStore {
    blobs: Vec<String>,
}

impl LicenseStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every readable file in `dir` as one license blob each.
    ///
    /// Unreadable individual files are skipped with a warning. A missing or
    /// non-directory path yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error only if the directory exists but cannot be listed.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();

        if !dir.is_dir() {
            warn!(path = %dir.display(), "License directory not found");
            return Ok(Self::new());
        }

        let mut blobs = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            match std::fs::read_to_string(&path) {
                Ok(content) => {
                    debug!(file = %path.display(), "Loaded license file");
                    blobs.push(content);
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Failed to read license file");
                }
            }
        }

        Ok(Self { blobs })
    }

    /// Number of loaded blobs.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Whether the store holds no blobs.
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Iterate over the loaded blobs.
    pub fn blobs(&self) -> impl Iterator<Item = &str> {
        self.blobs.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_directory_is_empty_store() {
        let store = LicenseStore::load_dir("/nonexistent/licenses").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_loads_each_file_as_one_blob() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.lic"), "blob-a").unwrap();
        fs::write(dir.path().join("b.lic"), "blob-b").unwrap();

        let store = LicenseStore::load_dir(dir.path()).unwrap();
        assert_eq!(store.len(), 2);

        let mut blobs: Vec<_> = store.blobs().collect();
        blobs.sort();
        assert_eq!(blobs, vec!["blob-a", "blob-b"]);
    }

    #[test]
    fn test_subdirectories_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("a.lic"), "blob-a").unwrap();

        let store = LicenseStore::load_dir(dir.path()).unwrap();
        assert_eq!(store.len(), 1);
    }
}
