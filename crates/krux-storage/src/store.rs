//! JSON key-value document backing one storage location.
//!
//! The document is a single JSON object keyed by mnemonic ID. Reads treat a
//! missing or corrupt file as an empty store and an unparsable entry as
//! absent; writes rewrite the whole document atomically and keep every
//! other entry, readable or not, in insertion order.

use std::fs;
use std::path::{Path, PathBuf};

use krux_crypto_core::EncryptionVersion;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::StorageError;

/// File name of the mnemonic document at each location.
pub const SEEDS_FILE: &str = "seeds.json";

/// One encrypted mnemonic as persisted in `seeds.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredRecord {
    /// Base64 ciphertext (leading IV block included for CBC).
    pub data: String,
    /// Cipher scheme; older records store its name instead of the tag.
    pub version: EncryptionVersion,
    /// PBKDF2 rounds used when the record was written.
    pub key_iterations: u32,
}

/// A `seeds.json`-style document in one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Store backed by `{dir}/seeds.json`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(SEEDS_FILE)
    }

    // ── Reads ──────────────────────────────────────────────────────

    fn load(&self) -> Map<String, Value> {
        let path = self.path();
        let Ok(contents) = fs::read_to_string(&path) else {
            return Map::new();
        };
        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                warn!(path = %path.display(), "store document is not an object, treating as empty");
                Map::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt store document, treating as empty");
                Map::new()
            }
        }
    }

    /// All keys in insertion order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.load().keys().cloned().collect()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.load().contains_key(key)
    }

    /// Typed entry for `key`, or `None` if absent or unparsable.
    #[must_use]
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.load().remove(key)?;
        serde_json::from_value(value)
            .map_err(|e| warn!(key, error = %e, "unreadable store entry"))
            .ok()
    }

    // ── Writes ─────────────────────────────────────────────────────

    /// Insert or overwrite `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if `value` cannot be encoded
    /// and `StorageError::Io` if the document cannot be written.
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let mut map = self.load();
        map.insert(key.to_owned(), serde_json::to_value(value)?);
        self.save(&map)?;
        debug!(key, path = %self.path().display(), "store entry written");
        Ok(())
    }

    /// Remove `key`, returning whether it was present. An absent key
    /// leaves the document untouched.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the document cannot be rewritten.
    pub fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let mut map = self.load();
        if map.shift_remove(key).is_none() {
            return Ok(false);
        }
        self.save(&map)?;
        debug!(key, path = %self.path().display(), "store entry removed");
        Ok(true)
    }

    fn save(&self, map: &Map<String, Value>) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_vec(map)?;
        write_atomic(&self.dir, SEEDS_FILE, &json)?;
        Ok(())
    }
}

/// Write `{dir}/{file_name}` via a `.tmp` sibling and a rename, with
/// owner-only permissions on Unix.
pub(crate) fn write_atomic(dir: &Path, file_name: &str, contents: &[u8]) -> std::io::Result<()> {
    let path = dir.join(file_name);
    let tmp = dir.join(format!(".{file_name}.tmp"));

    fs::write(&tmp, contents)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))?;
    }

    fs::rename(&tmp, &path)
}

// ── Tests ──────────────────────────────────────────────────────────
