// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistent key-value slots for the session token.

use crate::error::{ClientError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Fixed key of the token slot.
pub const TOKEN_KEY: &str = "authToken";

/// A small string key-value store that survives restarts.
pub trait TokenStore: Send + Sync {
    /// Read a slot. Unreadable storage reads as empty.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a slot, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Clear a slot. Clearing an empty slot is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory store, for tests and short-lived embedders.
#[derive(Default)]
pub struct MemoryTokenStore {
    slots: RwLock<BTreeMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.slots.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.slots
            .write()
            .map_err(|_| ClientError::Storage("token store lock poisoned".to_string()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.slots
            .write()
            .map_err(|_| ClientError::Storage("token store lock poisoned".to_string()))?
            .remove(key);
        Ok(())
    }
}

/// JSON-file store: one object mapping slot keys to values.
pub struct FileTokenStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: RwLock<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                ClientError::Storage(format!("{}: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(ClientError::Storage(format!(
                "{}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn save(&self, slots: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::Storage(format!("{}: {}", parent.display(), e)))?;
        }

        let raw = serde_json::to_string_pretty(slots)
            .map_err(|e| ClientError::Internal(anyhow::anyhow!(e)))?;

        // Write then rename so a crash never leaves a half-written slot file.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, raw)
            .and_then(|()| std::fs::rename(&tmp, &self.path))
            .map_err(|e| ClientError::Storage(format!("{}: {}", self.path.display(), e)))
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.read().ok()?;
        match self.load() {
            Ok(mut slots) => slots.remove(key),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read token store, treating as empty");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self
            .lock
            .write()
            .map_err(|_| ClientError::Storage("token store lock poisoned".to_string()))?;
        let mut slots = self.load().unwrap_or_default();
        slots.insert(key.to_string(), value.to_string());
        self.save(&slots)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self
            .lock
            .write()
            .map_err(|_| ClientError::Storage("token store lock poisoned".to_string()))?;
        let mut slots = self.load().unwrap_or_default();
        if slots.remove(key).is_some() {
            self.save(&slots)?;
        }
        Ok(())
    }
}
