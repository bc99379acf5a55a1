//! JSON-file store with atomic batch rewrites.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rand::Rng;

use crate::{SessionStore, StoreError};

/// A [`SessionStore`] backed by one JSON object in a file.
///
/// Every batch rewrites the whole file through a temporary sibling and a
/// rename, so a crash mid-write leaves either the old object or the new
/// one on disk, never a mix of the two. Reads go to disk each time; the file
/// is tiny and another process may have logged out in the meantime.
///
/// File layout:
///
/// ```json
/// { "token": "abc", "user": "{\"id\":1,...}" }
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store at `path`. Nothing touches the disk until the first
    /// read or write; missing parent directories are created on write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the whole object. A missing file is an empty store.
    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(BTreeMap::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    /// Loads for a read-modify-write. A corrupt file is replaced, not
    /// preserved: the batch about to be written is the newest truth.
    /// The flag reports whether the file was corrupt.
    fn load_for_update(&self) -> Result<(BTreeMap<String, String>, bool), StoreError> {
        match self.load() {
            Ok(map) => Ok((map, false)),
            Err(StoreError::Corrupt { source, .. }) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %source,
                    "discarding corrupt session store file"
                );
                Ok((BTreeMap::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let bytes = serde_json::to_vec_pretty(entries).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        let tmp = self.temp_path();
        fs::write(&tmp, bytes).map_err(|e| self.io_error(e))?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(self.io_error(e));
        }
        Ok(())
    }

    /// `session.json` → `session.json.<16 hex chars>.tmp`, in the same
    /// directory so the rename never crosses filesystems.
    fn temp_path(&self) -> PathBuf {
        let suffix: u64 = rand::rng().random();
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(".{suffix:016x}.tmp"));
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.remove(key))
    }

    fn set_all(&mut self, entries: &[(&str, &str)]) -> Result<(), StoreError> {
        let (mut map, _) = self.load_for_update()?;
        for (key, value) in entries {
            map.insert((*key).to_string(), (*value).to_string());
        }
        self.save(&map)
    }

    fn remove_all(&mut self, keys: &[&str]) -> Result<(), StoreError> {
        let (mut map, corrupt) = self.load_for_update()?;
        let before = map.len();
        for key in keys {
            map.remove(*key);
        }
        if map.len() == before && !corrupt {
            return Ok(());
        }
        self.save(&map)
    }
}
