//! Key-value blob storage and the persisted opening store.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Result, TrainerError};
use crate::migration;
use crate::theory::TheoryIndex;
use crate::tree::Forest;

/// Key holding the JSON forest.
pub const OPENINGS_KEY: &str = "openings";
/// Key holding the schema version as a decimal string.
pub const VERSION_KEY: &str = "openings_version";

/// Synchronous string store with last-write-wins semantics.
pub trait BlobStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// One file per key inside a directory.
///
/// Writes go to a temporary file that is renamed over the target, so a
/// crash leaves either the old or the new value.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        fs::create_dir_all(dir.as_ref())?;
        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
        })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl BlobStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let target = self.path(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &target)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Read the forest and version; absent keys mean an empty forest at version 0.
pub fn load_raw<B: BlobStore>(blobs: &B) -> Result<(Forest, u32)> {
    let forest = match blobs.get(OPENINGS_KEY)? {
        Some(json) if !json.trim().is_empty() => serde_json::from_str(&json)?,
        _ => Forest::default(),
    };

    let version = match blobs.get(VERSION_KEY)? {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| TrainerError::BadVersion(v.clone()))?,
        None => 0,
    };

    Ok((forest, version))
}

/// The saved-opening forest mirrored to a blob store.
#[derive(Debug)]
pub struct OpeningStore<B: BlobStore> {
    pub(crate) blobs: B,
    pub(crate) forest: Forest,
    version: u32,
}

impl<B: BlobStore> OpeningStore<B> {
    /// Load from `blobs`, migrating to the current schema first if needed.
    pub fn open(mut blobs: B, theory: &TheoryIndex) -> Result<Self> {
        let (forest, version) = migration::migrate(&mut blobs, theory)?;
        tracing::info!(
            "Opening store ready: {} roots, {} nodes, schema v{}",
            forest.roots.len(),
            forest.node_count(),
            version
        );
        Ok(Self {
            blobs,
            forest,
            version,
        })
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn blobs(&self) -> &B {
        &self.blobs
    }

    /// Write `next` to the blob store, then adopt it as the in-memory
    /// forest. On a failed write the current forest is kept.
    pub(crate) fn commit(&mut self, next: Forest) -> Result<()> {
        let json = serde_json::to_string(&next)?;
        self.blobs.set(OPENINGS_KEY, &json)?;
        tracing::debug!("Persisted forest ({} bytes)", json.len());
        self.forest = next;
        Ok(())
    }
}
