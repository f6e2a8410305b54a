// SPDX-License-Identifier: MIT

//! Pluggable key-value storage backends.
//!
//! The persisted state is a handful of string values under fixed keys. The
//! backend trait exists so the domain logic can run against an in-memory
//! fake in tests and a quota-bounded file store in production.

use std::collections::HashMap;
use std::fs;
use std::io::Write as _;
use std::path::PathBuf;

/// Storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store cannot hold the value. Callers decide whether to
    /// trim history or surface the failure.
    #[error("storage quota exceeded")]
    QuotaExceeded,

    #[error("storage I/O error: {0}")]
    Io(String),
}

/// A string key-value store with explicit quota signaling.
pub trait StorageBackend: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

// ─── File backend ────────────────────────────────────────────

/// One file per key under a data directory. Writes go through a temp file
/// and rename so a crash never leaves a half-written blob behind.
pub struct FileBackend {
    dir: PathBuf,
    /// Total byte budget across all keys; None = unbounded
    max_store_bytes: Option<u64>,
}

impl FileBackend {
    pub fn new(dir: PathBuf, max_store_bytes: Option<u64>) -> Result<Self, StoreError> {
        fs::create_dir_all(&dir).map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(Self {
            dir,
            max_store_bytes,
        })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        // Keys are fixed identifiers; anything else is a programming error
        // upstream, not a valid filename.
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(StoreError::Io(format!("invalid store key: {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }

    /// Bytes currently stored under every key except `skip`.
    fn stored_bytes_excluding(&self, skip: &PathBuf) -> Result<u64, StoreError> {
        let mut total = 0;
        let entries = fs::read_dir(&self.dir).map_err(|e| StoreError::Io(e.to_string()))?;
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::Io(e.to_string()))?;
            if entry.path() == *skip {
                continue;
            }
            total += entry
                .metadata()
                .map_err(|e| StoreError::Io(e.to_string()))?
                .len();
        }
        Ok(total)
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e.to_string())),
        }
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;

        if let Some(budget) = self.max_store_bytes {
            let others = self.stored_bytes_excluding(&path)?;
            if others + value.len() as u64 > budget {
                return Err(StoreError::QuotaExceeded);
            }
        }

        let tmp = path.with_extension("tmp");
        let mut file = fs::File::create(&tmp).map_err(|e| StoreError::Io(e.to_string()))?;
        file.write_all(value.as_bytes()).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            // A full disk shows up here as an I/O error; treat it as quota
            // so the trim policy gets a chance to recover.
            if e.raw_os_error() == Some(28) {
                StoreError::QuotaExceeded
            } else {
                StoreError::Io(e.to_string())
            }
        })?;
        file.sync_all().map_err(|e| StoreError::Io(e.to_string()))?;
        fs::rename(&tmp, &path).map_err(|e| StoreError::Io(e.to_string()))
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e.to_string())),
        }
    }
}

// ─── Memory backend ──────────────────────────────────────────

/// In-memory backend for tests, with the same quota semantics as the file
/// backend.
#[derive(Default)]
pub struct MemoryBackend {
    map: HashMap<String, String>,
    max_store_bytes: Option<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that signals `QuotaExceeded` once total stored bytes would
    /// exceed the budget.
    pub fn with_quota(max_store_bytes: usize) -> Self {
        Self {
            map: HashMap::new(),
            max_store_bytes: Some(max_store_bytes),
        }
    }

    fn stored_bytes_excluding(&self, skip: &str) -> usize {
        self.map
            .iter()
            .filter(|(k, _)| k.as_str() != skip)
            .map(|(_, v)| v.len())
            .sum()
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.map.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(budget) = self.max_store_bytes {
            if self.stored_bytes_excluding(key) + value.len() > budget {
                return Err(StoreError::QuotaExceeded);
            }
        }
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.map.remove(key);
        Ok(())
    }
}
