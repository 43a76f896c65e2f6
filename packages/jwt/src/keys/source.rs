//! Key sources: where raw key bytes come from

use crate::error::{JwtBuildError, JwtResult};
use std::collections::HashMap;
use std::path::PathBuf;
use zeroize::Zeroizing;

/// Reads the raw bytes stored at a key location
///
/// Implementations must be shareable across threads so a build can move to a
/// blocking worker.
pub trait KeySource: Send + Sync {
    /// Read the key material at `location`
    ///
    /// # Errors
    /// Returns `JwtBuildError::KeyLoad` if the location cannot be read
    fn read(&self, location: &str) -> JwtResult<Zeroizing<Vec<u8>>>;
}

/// Reads key files from the file system
///
/// Without a base directory locations are plain paths. With one, locations
/// are resolved beneath it and a leading `/` names the base directory itself,
/// so `/privateKey.pem` and `privateKey.pem` are the same resource.
#[derive(Debug, Clone, Default)]
pub struct FileKeySource {
    base_dir: Option<PathBuf>,
}

impl FileKeySource {
    /// Source reading locations as plain file system paths
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Source resolving locations beneath `base_dir`
    #[must_use]
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    fn path_for(&self, location: &str) -> PathBuf {
        match &self.base_dir {
            Some(base) => base.join(location.trim_start_matches('/')),
            None => PathBuf::from(location),
        }
    }
}

impl KeySource for FileKeySource {
    fn read(&self, location: &str) -> JwtResult<Zeroizing<Vec<u8>>> {
        let path = self.path_for(location);
        tracing::debug!(location, path = %path.display(), "Reading key file");
        std::fs::read(&path)
            .map(Zeroizing::new)
            .map_err(|e| JwtBuildError::key_load(location, e.to_string()))
    }
}

/// In-memory key store keyed by location
#[derive(Default)]
pub struct MemoryKeySource {
    entries: HashMap<String, Zeroizing<Vec<u8>>>,
}

impl MemoryKeySource {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add key material under `location`
    #[must_use]
    pub fn with_key(mut self, location: impl Into<String>, material: impl Into<Vec<u8>>) -> Self {
        self.insert(location, material);
        self
    }

    /// Add or replace key material under `location`
    pub fn insert(&mut self, location: impl Into<String>, material: impl Into<Vec<u8>>) {
        self.entries
            .insert(location.into(), Zeroizing::new(material.into()));
    }
}

impl KeySource for MemoryKeySource {
    fn read(&self, location: &str) -> JwtResult<Zeroizing<Vec<u8>>> {
        self.entries
            .get(location)
            .map(|bytes| Zeroizing::new(bytes.to_vec()))
            .ok_or_else(|| JwtBuildError::key_load(location, "no key stored at this location"))
    }
}
