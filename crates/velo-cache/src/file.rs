//! Directory-backed key-value store.
//!
//! Each key is one file named after the URL-safe base64 encoding of the key,
//! so arbitrary keys (`velo:cart`, paths, unicode) map to portable file names.
//! Writes go to a temporary sibling first and are renamed into place, which
//! keeps readers from ever observing a half-written record.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::Rng;
use tracing::debug;

use crate::{CacheError, KvStore};

const RECORD_EXTENSION: &str = "json";

/// A store that keeps one file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            CacheError::OpenError(format!("cannot create {}: {e}", dir.display()))
        })?;
        Ok(Self { dir })
    }

    /// Directory backing this store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name = URL_SAFE_NO_PAD.encode(key.as_bytes());
        self.dir.join(format!("{name}.{RECORD_EXTENSION}"))
    }

    fn key_for(path: &Path) -> Option<String> {
        if path.extension()?.to_str()? != RECORD_EXTENSION {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        let bytes = URL_SAFE_NO_PAD.decode(stem).ok()?;
        String::from_utf8(bytes).ok()
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        let target = self.path_for(key);
        let suffix: u64 = rand::thread_rng().gen();
        let tmp = target.with_extension(format!("{suffix:016x}.tmp"));

        fs::write(&tmp, value)?;
        if let Err(e) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        debug!(key, path = %target.display(), bytes = value.len(), "record written");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.path_for(key).is_file())
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if let Some(key) = Self::key_for(&path) {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }
}
