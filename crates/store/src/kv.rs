//! Key-value storage backends
//!
//! Settings, templates, the recent-documents index and locally saved
//! documents all live in a flat string-to-string store.

use crate::{Result, StoreError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A flat string key-value store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`; fails with [`StoreError::QuotaExceeded`]
    /// when the store is full
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing an absent key is not an error
    fn remove(&mut self, key: &str) -> Result<()>;

    fn keys(&self) -> Result<Vec<String>>;
}

/// Check a write of `incoming` bytes replacing `existing` bytes against a quota
fn check_quota(quota: Option<usize>, used: usize, existing: usize, incoming: usize) -> Result<()> {
    let Some(quota) = quota else {
        return Ok(());
    };
    let needed = used - existing + incoming;
    if needed > quota {
        return Err(StoreError::QuotaExceeded {
            needed,
            available: quota.saturating_sub(used - existing),
        });
    }
    Ok(())
}

// =============================================================================
// Memory store
// =============================================================================

/// In-memory store with an optional byte quota over keys and values
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            quota: Some(quota),
        }
    }

    /// Bytes currently used by keys and values
    pub fn used(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let existing = self.entries.get(key).map_or(0, |v| key.len() + v.len());
        check_quota(self.quota, self.used(), existing, key.len() + value.len())?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}

// =============================================================================
// File store
// =============================================================================

const FILE_EXTENSION: &str = "json";

/// Directory-backed store: one file per key
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    quota: Option<usize>,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir, quota: None })
    }

    pub fn with_quota(mut self, quota: usize) -> Self {
        self.quota = Some(quota);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", encode_key(key), FILE_EXTENSION))
    }

    fn used(&self) -> Result<usize> {
        let mut total = 0;
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            if entry.path().extension().is_some_and(|ext| ext == FILE_EXTENSION) {
                total += entry.metadata()?.len() as usize;
            }
        }
        Ok(total)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        if self.quota.is_some() {
            let existing = if path.exists() {
                std::fs::metadata(&path)?.len() as usize
            } else {
                0
            };
            check_quota(self.quota, self.used()?, existing, value.len())?;
        }
        std::fs::write(path, value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == FILE_EXTENSION) {
                if let Some(key) = path.file_stem().and_then(|s| s.to_str()).and_then(decode_key) {
                    keys.push(key);
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Percent-encode the key so any key maps to a safe file name
fn encode_key(key: &str) -> String {
    urlencoding::encode(key).into_owned()
}

fn decode_key(name: &str) -> Option<String> {
    urlencoding::decode(name).ok().map(|key| key.into_owned())
}
