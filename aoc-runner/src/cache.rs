//! File cache for puzzle pages, inputs, submissions and statistics

use crate::error::CacheError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Text store addressed by relative, `/`-separated keys
///
/// `puzzles/2023/1.html` lives at `{root}/puzzles/2023/1.html`.
#[derive(Debug, Clone)]
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a key is stored at
    pub fn location(&self, key: &str) -> Result<PathBuf, CacheError> {
        let relative = Path::new(key);
        let valid = !key.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !valid {
            return Err(CacheError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(relative))
    }

    pub fn read(&self, key: &str) -> Result<String, CacheError> {
        let path = self.location(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => {
                debug!(key, "Cache hit");
                Ok(text)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(key, "Cache miss");
                Err(CacheError::NotCached(key.to_string()))
            }
            Err(source) => Err(CacheError::Io { path, source }),
        }
    }

    /// Replace the entry through a synced sibling temp file and a rename
    pub fn write(&self, key: &str, text: &str) -> Result<(), CacheError> {
        let path = self.location(key)?;
        let io_error = |path: &Path| {
            let path = path.to_path_buf();
            move |source| CacheError::Io { path, source }
        };

        let dir = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(dir).map_err(io_error(dir))?;
        let mut temp = NamedTempFile::new_in(dir).map_err(io_error(dir))?;
        temp.write_all(text.as_bytes())
            .and_then(|()| temp.as_file().sync_all())
            .map_err(io_error(temp.path()))?;
        temp.persist(&path).map_err(|e| io_error(&path)(e.error))?;
        debug!(key, "Cache write");
        Ok(())
    }

    /// Delete an entry, returning whether it existed
    pub fn remove(&self, key: &str) -> Result<bool, CacheError> {
        let path = self.location(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(CacheError::Io { path, source }),
        }
    }

    /// Parsed JSON entry, `None` when not cached
    pub fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let text = match self.read(key) {
            Ok(text) => text,
            Err(CacheError::NotCached(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| CacheError::Json {
                key: key.to_string(),
                source,
            })
    }

    pub fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let text = serde_json::to_string_pretty(value).map_err(|source| CacheError::Json {
            key: key.to_string(),
            source,
        })?;
        self.write(key, &text)
    }
}
