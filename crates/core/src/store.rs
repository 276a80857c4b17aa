// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Key/value persistence for the queue blob.
//!
//! Provides a trait-based store so the queue can be mirrored to:
//! - Files on disk for production ([`FileStore`])
//! - An in-process map for tests and embedders ([`MemoryStore`])

use std::collections::HashMap;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};

/// Boxed future returned by [`PersistenceStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Scoped asynchronous key/value storage.
pub trait PersistenceStore: Send + Sync {
    /// Reads the value stored under `key`, or `None` if nothing is stored.
    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>>;

    /// Replaces the value stored under `key`.
    fn set<'a>(&'a self, key: &'a str, value: String) -> StoreFuture<'a, ()>;

    /// Removes the value stored under `key`. Removing a missing key is not an error.
    fn remove<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ()>;
}

/// Validates that a key is usable as a file name on every platform.
pub fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key != "."
        && key != ".."
        && key.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidKey(key.to_string()))
    }
}

/// Store that keeps one JSON file per key inside a directory.
///
/// Writes go to a temporary file that is fsynced and then renamed over the
/// target, so a crash never leaves a half-written blob behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create or open a store rooted at `dir`.
    pub fn open(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(FileStore { dir: dir.to_path_buf() })
    }

    /// Directory holding the store's files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl PersistenceStore for FileStore {
    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>> {
        Box::pin(async move {
            let path = self.path_for(key)?;
            match tokio::fs::read_to_string(&path).await {
                Ok(content) => Ok(Some(content)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn set<'a>(&'a self, key: &'a str, value: String) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let path = self.path_for(key)?;
            let tmp = self.dir.join(format!("{key}.json.tmp"));

            let mut file = tokio::fs::File::create(&tmp).await?;
            file.write_all(value.as_bytes()).await?;
            file.sync_all().await?;
            drop(file);

            tokio::fs::rename(&tmp, &path).await?;
            Ok(())
        })
    }

    fn remove<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let path = self.path_for(key)?;
            match tokio::fs::remove_file(&path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
    }
}

/// In-process store. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a value without going through the async interface.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).get(key).cloned()
    }

    /// Writes a value without going through the async interface.
    pub fn insert(&self, key: &str, value: impl Into<String>) {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).insert(key.to_string(), value.into());
    }
}

impl PersistenceStore for MemoryStore {
    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>> {
        Box::pin(async move { Ok(self.peek(key)) })
    }

    fn set<'a>(&'a self, key: &'a str, value: String) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.insert(key, value);
            Ok(())
        })
    }

    fn remove<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.entries.lock().unwrap_or_else(|e| e.into_inner()).remove(key);
            Ok(())
        })
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
