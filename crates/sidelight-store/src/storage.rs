//! Key-value storage backends.
//!
//! The store only needs string-keyed get/set of a serialized blob, one
//! record per workspace. `FileStorage` keeps each key in its own file and
//! replaces it atomically; `MemoryStorage` backs tests and embedders that
//! persist elsewhere.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("read {key}: {detail}")]
    Read { key: String, detail: String },
    #[error("write {key}: {detail}")]
    Write { key: String, detail: String },
}

/// String-keyed blob storage, one writer at a time by construction.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// A write fully replaces any prior value for the key.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory storage with a write counter for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    writes: u64,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value without counting it as a store-initiated write.
    pub fn seed(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), value.to_owned());
    }

    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.writes
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        self.writes += 1;
        Ok(())
    }
}

/// One file per key under a root directory, written via temp-file rename so
/// a crash mid-write never leaves a truncated record.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_key(key)))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::Read {
                key: key.to_owned(),
                detail: err.to_string(),
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let write_err = |detail: String| StorageError::Write {
            key: key.to_owned(),
            detail,
        };

        fs::create_dir_all(&self.root)
            .map_err(|err| write_err(format!("create {}: {err}", self.root.display())))?;

        let path = self.key_path(key);
        let temp = temp_path(&path);
        write_file_atomic(&temp, value.as_bytes()).map_err(write_err)?;
        if let Err(err) = fs::rename(&temp, &path) {
            let _ = fs::remove_file(&temp);
            return Err(write_err(format!(
                "rename {} -> {}: {err}",
                temp.display(),
                path.display()
            )));
        }
        Ok(())
    }
}

fn write_file_atomic(path: &Path, bytes: &[u8]) -> Result<(), String> {
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)
        .map_err(|err| format!("open {}: {err}", path.display()))?;
    file.write_all(bytes)
        .map_err(|err| format!("write {}: {err}", path.display()))?;
    file.sync_all()
        .map_err(|err| format!("sync {}: {err}", path.display()))?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut raw = path.as_os_str().to_os_string();
    raw.push(format!(".tmp-{}", std::process::id()));
    PathBuf::from(raw)
}

fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.') {
                ch
            } else {
                '-'
            }
        })
        .collect()
}
